/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use clap::{Arg, ArgAction, ArgMatches, Command};

use g3_ftp_session::{FtpClient, FtpFile, filter, reply_code};

pub(super) const COMMAND: &str = "list";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_PARSER: &str = "parser";
const COMMAND_ARG_DIRS: &str = "dirs";
const COMMAND_ARG_RAW: &str = "raw";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("List path in ls style")
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("FILE PATH")
                .num_args(1),
        )
        .arg(
            Arg::new(COMMAND_ARG_PARSER)
                .help("entry parser key, detected with SYST if not set")
                .value_name("KEY")
                .num_args(1)
                .long("parser"),
        )
        .arg(
            Arg::new(COMMAND_ARG_DIRS)
                .help("only show directories")
                .action(ArgAction::SetTrue)
                .long("dirs")
                .short('d'),
        )
        .arg(
            Arg::new(COMMAND_ARG_RAW)
                .help("print the listing lines as returned by the server")
                .action(ArgAction::SetTrue)
                .long("raw"),
        )
}

pub(super) fn print_files(files: &[FtpFile], raw: bool) {
    for f in files {
        if raw {
            println!("{f}");
        } else {
            println!("{}", f.to_formatted_string());
        }
    }
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.get_one::<String>(COMMAND_ARG_PATH).map(|s| s.as_str());
    let parser = args
        .get_one::<String>(COMMAND_ARG_PARSER)
        .map(|s| s.as_str());

    let engine = client.initiate_list_parsing(parser, path).await?;
    if engine.is_empty() {
        let code = client.reply_code();
        super::check_reply(client, reply_code::is_positive_completion(code), "list")?;
    }
    let files: Vec<FtpFile> = if args.get_flag(COMMAND_ARG_DIRS) {
        engine
            .get_files_with(&filter::Directories)
            .into_iter()
            .flatten()
            .collect()
    } else {
        engine.get_files()
    };
    print_files(&files, args.get_flag(COMMAND_ARG_RAW));
    Ok(())
}
