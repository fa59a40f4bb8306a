/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "mkd";

const COMMAND_ARG_PATH: &str = "path";

pub(super) fn command() -> Command {
    Command::new(COMMAND).about("Make directory").arg(
        Arg::new(COMMAND_ARG_PATH)
            .value_name("DIR PATH")
            .num_args(1)
            .required(true),
    )
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args
        .get_one::<String>(COMMAND_ARG_PATH)
        .ok_or_else(|| anyhow!("no path set"))?;

    let done = client.make_directory(path).await?;
    super::check_reply(client, done, "make directory")
}
