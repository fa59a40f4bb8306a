/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use clap::{Arg, ArgAction, ArgMatches, Command};

use g3_ftp_session::{FtpClient, reply_code};

pub(super) const COMMAND: &str = "mlsd";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_RAW: &str = "raw";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("List path in machine readable format")
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("FILE PATH")
                .num_args(1),
        )
        .arg(
            Arg::new(COMMAND_ARG_RAW)
                .help("print the facts as returned by the server")
                .action(ArgAction::SetTrue)
                .long("raw"),
        )
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.get_one::<String>(COMMAND_ARG_PATH).map(|s| s.as_str());

    let files = client.mlist_dir(path).await?;
    let code = client.reply_code();
    super::check_reply(client, reply_code::is_positive_completion(code), "mlsd")?;
    super::cmd_list::print_files(&files, args.get_flag(COMMAND_ARG_RAW));
    Ok(())
}
