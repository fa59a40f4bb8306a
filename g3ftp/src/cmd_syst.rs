/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use clap::{ArgMatches, Command};

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "syst";

pub(super) fn command() -> Command {
    Command::new(COMMAND).about("Show the server system type")
}

pub(super) async fn run(client: &mut FtpClient, _args: &ArgMatches) -> anyhow::Result<()> {
    let system = client.get_system_type().await?;
    println!("{system}");
    Ok(())
}
