/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use g3_ftp_session::FtpClient;

pub(super) const COMMAND: &str = "stat";

const COMMAND_ARG_PATH: &str = "path";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Fetch file stats")
        .arg(Arg::new(COMMAND_ARG_PATH).value_name("PATH").num_args(1))
}

pub(super) async fn run(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let path = args.get_one::<String>(COMMAND_ARG_PATH).map(|s| s.as_str());

    if let Some(f) = client.mlist_file(path).await? {
        println!("Path: {}", f.name());
        println!("Type: {:?}", f.kind());
        if f.size() >= 0 {
            println!("Size: {}", f.size());
        }
        if let Some(dt) = f.timestamp() {
            println!("Modify Time: {dt}");
        }
        if !f.user().is_empty() {
            println!("Owner: {}:{}", f.user(), f.group());
        }
        return Ok(());
    }

    // no MLST support, try SIZE and MDTM on files
    let Some(path) = path else {
        return Err(anyhow!("mlst failed: {}", client.reply_string().trim_end()));
    };
    let size = client.file_size(path).await?;
    let mtime = client.modification_time(path).await?;
    if size.is_none() && mtime.is_none() {
        return Err(anyhow!("stat failed: {}", client.reply_string().trim_end()));
    }
    println!("Path: {path}");
    if let Some(size) = size {
        println!("Size: {size}");
    }
    if let Some(dt) = mtime {
        println!("Modify Time: {dt}");
    }
    Ok(())
}
