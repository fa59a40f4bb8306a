/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::info;
use tokio::io::AsyncWriteExt;

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "get";

const COMMAND_ARG_REMOTE: &str = "remote";
const COMMAND_ARG_LOCAL: &str = "local";
const COMMAND_ARG_OFFSET: &str = "offset";
pub(super) const COMMAND_ARG_PROGRESS: &str = "progress";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Download file")
        .arg(
            Arg::new(COMMAND_ARG_REMOTE)
                .value_name("REMOTE PATH")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_LOCAL)
                .help("local file path, the file content is written to stdout if not set")
                .value_name("LOCAL PATH")
                .value_hint(ValueHint::FilePath)
                .num_args(1),
        )
        .arg(
            Arg::new(COMMAND_ARG_OFFSET)
                .help("restart the download at this offset")
                .value_name("OFFSET")
                .value_parser(clap::value_parser!(u64))
                .num_args(1)
                .long("offset"),
        )
        .arg(
            Arg::new(COMMAND_ARG_PROGRESS)
                .help("log the transfer progress")
                .action(ArgAction::SetTrue)
                .long("progress"),
        )
}

pub(super) fn set_progress_listener(client: &mut FtpClient, args: &ArgMatches) {
    if !args.get_flag(COMMAND_ARG_PROGRESS) {
        return;
    }
    let mut last_mb = 0;
    client.set_copy_stream_listener(Some(Box::new(
        move |total: u64, _bytes: usize, size: Option<u64>| {
            let mb = total >> 20;
            if mb > last_mb {
                last_mb = mb;
                match size {
                    Some(size) => info!("{total}/{size} bytes transferred"),
                    None => info!("{total} bytes transferred"),
                }
            }
        },
    )));
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let remote = args
        .get_one::<String>(COMMAND_ARG_REMOTE)
        .ok_or_else(|| anyhow!("no remote path set"))?;
    if let Some(offset) = args.get_one::<u64>(COMMAND_ARG_OFFSET) {
        client.set_restart_offset(*offset);
    }
    set_progress_listener(client, args);

    let done = match args.get_one::<String>(COMMAND_ARG_LOCAL) {
        Some(local) => {
            let opened = if args.contains_id(COMMAND_ARG_OFFSET) {
                tokio::fs::OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(local)
                    .await
            } else {
                tokio::fs::File::create(local).await
            };
            let mut file = opened.context(format!("failed to open local file {local}"))?;
            let done = client.retrieve_file(remote, &mut file).await?;
            file.flush().await?;
            done
        }
        None => {
            let mut stdout = tokio::io::stdout();
            let done = client.retrieve_file(remote, &mut stdout).await?;
            stdout.flush().await?;
            done
        }
    };
    super::check_reply(client, done, "download")
}
