/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use clap::{Arg, ArgMatches, Command};

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "nlst";

const COMMAND_ARG_PATH: &str = "path";

pub(super) fn command() -> Command {
    Command::new(COMMAND).about("List names in path").arg(
        Arg::new(COMMAND_ARG_PATH)
            .value_name("FILE PATH")
            .num_args(1),
    )
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.get_one::<String>(COMMAND_ARG_PATH).map(|s| s.as_str());

    let names = client.list_names(path).await?;
    super::check_reply(client, names.is_some(), "nlst")?;
    for name in names.unwrap_or_default() {
        println!("{name}");
    }
    Ok(())
}
