/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use clap::{Arg, ArgMatches, Command};

use g3_ftp_session::{FtpClient, reply_code};

pub(super) const COMMAND: &str = "feat";

const COMMAND_ARG_FEATURE: &str = "feature";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Show server features")
        .arg(
            Arg::new(COMMAND_ARG_FEATURE)
                .help("only show the values of this feature")
                .value_name("FEATURE")
                .num_args(1),
        )
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    match args.get_one::<String>(COMMAND_ARG_FEATURE) {
        Some(feature) => {
            let values = client.feature_values(feature).await?;
            let code = client.reply_code();
            match values {
                Some(values) => {
                    for v in values {
                        println!("{feature} {v}");
                    }
                }
                None if reply_code::is_positive_completion(code) => {
                    println!("{feature} is not supported");
                }
                None => super::check_reply(client, false, "feat")?,
            }
        }
        None => {
            let done = client.features().await?;
            super::check_reply(client, done, "feat")?;
            print!("{}", client.reply_string());
        }
    }
    Ok(())
}
