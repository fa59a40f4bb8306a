/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "put";

const COMMAND_ARG_LOCAL: &str = "local";
const COMMAND_ARG_REMOTE: &str = "remote";
const COMMAND_ARG_APPEND: &str = "append";
const COMMAND_ARG_UNIQUE: &str = "unique";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Upload file")
        .arg(
            Arg::new(COMMAND_ARG_LOCAL)
                .value_name("LOCAL PATH")
                .value_hint(ValueHint::FilePath)
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_REMOTE)
                .help("remote file path, the local file name is used if not set")
                .value_name("REMOTE PATH")
                .num_args(1),
        )
        .arg(
            Arg::new(COMMAND_ARG_APPEND)
                .help("append to the remote file")
                .action(ArgAction::SetTrue)
                .long("append"),
        )
        .arg(
            Arg::new(COMMAND_ARG_UNIQUE)
                .help("let the server choose a unique remote file name")
                .action(ArgAction::SetTrue)
                .long("unique")
                .conflicts_with(COMMAND_ARG_APPEND),
        )
        .arg(
            Arg::new(super::cmd_get::COMMAND_ARG_PROGRESS)
                .help("log the transfer progress")
                .action(ArgAction::SetTrue)
                .long("progress"),
        )
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let local = args
        .get_one::<String>(COMMAND_ARG_LOCAL)
        .ok_or_else(|| anyhow!("no local path set"))?;
    let remote = match args.get_one::<String>(COMMAND_ARG_REMOTE) {
        Some(remote) => Some(remote.as_str()),
        None => Path::new(local).file_name().and_then(|s| s.to_str()),
    };
    super::cmd_get::set_progress_listener(client, args);

    let mut file = tokio::fs::File::open(local)
        .await
        .context(format!("failed to open local file {local}"))?;
    let done = if args.get_flag(COMMAND_ARG_UNIQUE) {
        client.store_unique_file(remote, &mut file).await?
    } else {
        let remote = remote.ok_or_else(|| anyhow!("no remote path for {local}"))?;
        if args.get_flag(COMMAND_ARG_APPEND) {
            client.append_file(remote, &mut file).await?
        } else {
            client.store_file(remote, &mut file).await?
        }
    };
    super::check_reply(client, done, "upload")?;
    println!("{}", client.reply_string().trim_end());
    Ok(())
}
