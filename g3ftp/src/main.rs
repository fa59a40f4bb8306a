/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use clap_complete::Shell;
use yaml_rust::YamlLoader;

use g3_ftp_session::{
    FtpClient, FtpClientConfig, FtpFileType, FtpTextFormat, TcpConnectionProvider, reply_code,
};

mod logger;
mod trace;

mod cmd_del;
mod cmd_feat;
mod cmd_get;
mod cmd_list;
mod cmd_mkd;
mod cmd_mlsd;
mod cmd_nlst;
mod cmd_put;
mod cmd_rmd;
mod cmd_stat;
mod cmd_syst;

const GLOBAL_ARG_COMPLETION: &str = "completion";
const GLOBAL_ARG_SERVER: &str = "server";
const GLOBAL_ARG_USERNAME: &str = "username";
const GLOBAL_ARG_PASSWORD: &str = "password";
const GLOBAL_ARG_ACCOUNT: &str = "account";
const GLOBAL_ARG_SOURCE_IP: &str = "source-ip";
const GLOBAL_ARG_CONFIG: &str = "config";
const GLOBAL_ARG_ACTIVE: &str = "active";
const GLOBAL_ARG_EPSV: &str = "epsv";
const GLOBAL_ARG_ASCII: &str = "ascii";
const GLOBAL_ARG_HIDDEN: &str = "hidden";
const GLOBAL_ARG_KEEPALIVE: &str = "keepalive";
const GLOBAL_ARG_DATA_TIMEOUT: &str = "data-timeout";
const GLOBAL_ARG_TRACE: &str = "trace";
const GLOBAL_ARG_VERBOSE: &str = "verbose";

const DEFAULT_USERNAME: &str = "anonymous";
const DEFAULT_PASSWORD: &str = "anonymous@";

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new(GLOBAL_ARG_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_SERVER)
                .help("FTP server address, with an optional port")
                .num_args(1)
                .value_name("SERVER ADDRESS")
                .required_unless_present(GLOBAL_ARG_COMPLETION),
        )
        .arg(
            Arg::new(GLOBAL_ARG_USERNAME)
                .help("FTP username")
                .num_args(1)
                .value_name("USERNAME")
                .short('u')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_PASSWORD)
                .help("FTP password")
                .num_args(1)
                .value_name("PASSWORD")
                .short('p')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_ACCOUNT)
                .help("FTP account, sent if the server asks for it")
                .num_args(1)
                .value_name("ACCOUNT")
                .long("account")
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_SOURCE_IP)
                .help("source ip address")
                .num_args(1)
                .value_name("IP ADDRESS")
                .value_parser(value_parser!(IpAddr))
                .long("source")
                .short('s')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_CONFIG)
                .help("client config file in yaml format")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .long("config")
                .short('c')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_ACTIVE)
                .help("use active mode for data connections")
                .action(ArgAction::SetTrue)
                .long("active")
                .short('A')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_EPSV)
                .help("use EPSV with IPv4 servers in passive mode")
                .action(ArgAction::SetTrue)
                .long("epsv")
                .conflicts_with(GLOBAL_ARG_ACTIVE)
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_ASCII)
                .help("transfer files in ascii type")
                .action(ArgAction::SetTrue)
                .long("ascii")
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_HIDDEN)
                .help("ask the server to list hidden files")
                .action(ArgAction::SetTrue)
                .long("hidden")
                .short('a')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_KEEPALIVE)
                .help("send NOOP on the control connection after idle seconds during transfer")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .long("keepalive")
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_DATA_TIMEOUT)
                .help("timeout in seconds for each data connection read or write")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .long("data-timeout")
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_TRACE)
                .help("print the control connection commands and replies")
                .action(ArgAction::SetTrue)
                .long("trace")
                .short('t')
                .global(true),
        )
        .arg(
            Arg::new(GLOBAL_ARG_VERBOSE)
                .help("show verbose message")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .global(true),
        )
        .subcommand(cmd_list::command())
        .subcommand(cmd_nlst::command())
        .subcommand(cmd_mlsd::command())
        .subcommand(cmd_stat::command())
        .subcommand(cmd_get::command())
        .subcommand(cmd_put::command())
        .subcommand(cmd_del::command())
        .subcommand(cmd_rmd::command())
        .subcommand(cmd_mkd::command())
        .subcommand(cmd_feat::command())
        .subcommand(cmd_syst::command())
}

/// Split `host[:port]`, IPv6 addresses with a port should be in brackets.
fn parse_server(s: &str) -> anyhow::Result<(String, u16)> {
    if let Some(v6) = s.strip_prefix('[') {
        let (host, left) = v6
            .split_once(']')
            .ok_or_else(|| anyhow!("no closing bracket found in {s}"))?;
        let port = match left.strip_prefix(':') {
            Some(port) => port.parse().context(format!("invalid port in {s}"))?,
            None if left.is_empty() => 21,
            None => return Err(anyhow!("invalid server address {s}")),
        };
        return Ok((host.to_string(), port));
    }

    match s.rsplit_once(':') {
        // bare ipv6 address
        Some((host, _)) if host.contains(':') => Ok((s.to_string(), 21)),
        Some((host, port)) => {
            let port = port.parse().context(format!("invalid port in {s}"))?;
            Ok((host.to_string(), port))
        }
        None => Ok((s.to_string(), 21)),
    }
}

fn load_config(args: &ArgMatches) -> anyhow::Result<FtpClientConfig> {
    let mut config = match args.get_one::<PathBuf>(GLOBAL_ARG_CONFIG) {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .context(format!("failed to read config file {}", path.display()))?;
            let docs = YamlLoader::load_from_str(&content)
                .context(format!("invalid yaml file {}", path.display()))?;
            match docs.first() {
                Some(doc) => FtpClientConfig::parse_yaml(doc)
                    .context(format!("invalid client config in {}", path.display()))?,
                None => FtpClientConfig::default(),
            }
        }
        None => FtpClientConfig::default(),
    };

    if args.get_flag(GLOBAL_ARG_EPSV) {
        config.use_epsv_with_ipv4 = true;
    }
    if args.get_flag(GLOBAL_ARG_HIDDEN) {
        config.list_hidden_files = true;
    }
    if let Some(secs) = args.get_one::<u64>(GLOBAL_ARG_KEEPALIVE) {
        config.transfer.control_keepalive_timeout = Some(Duration::from_secs(*secs));
    }
    if let Some(secs) = args.get_one::<u64>(GLOBAL_ARG_DATA_TIMEOUT) {
        config.transfer.data_timeout = Some(Duration::from_secs(*secs));
    }
    Ok(config)
}

async fn login(client: &mut FtpClient, args: &ArgMatches) -> anyhow::Result<()> {
    let username = args
        .get_one::<String>(GLOBAL_ARG_USERNAME)
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_USERNAME);
    let password = args
        .get_one::<String>(GLOBAL_ARG_PASSWORD)
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_PASSWORD);

    let logged_in = match args.get_one::<String>(GLOBAL_ARG_ACCOUNT) {
        Some(account) => {
            client
                .login_with_account(username, password, account)
                .await?
        }
        None => client.login(username, password).await?,
    };
    if logged_in {
        Ok(())
    } else {
        Err(anyhow!("login failed: {}", client.reply_string().trim_end()))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();

    if let Some(target) = args.get_one::<Shell>(GLOBAL_ARG_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let verbose_level = args
        .get_one::<u8>(GLOBAL_ARG_VERBOSE)
        .copied()
        .unwrap_or_default();
    logger::SyncLogger::new(verbose_level)
        .into_global_logger()
        .map_err(|e| anyhow!("failed to setup logger: {e}"))?;

    let server = args
        .get_one::<String>(GLOBAL_ARG_SERVER)
        .ok_or_else(|| anyhow!("no server address set"))?;
    let (host, port) = parse_server(server)?;

    let config = load_config(&args)?;
    let mut provider = TcpConnectionProvider::default();
    if let Some(ip) = args.get_one::<IpAddr>(GLOBAL_ARG_SOURCE_IP) {
        provider.set_bind_ip(*ip);
    }
    let mut client = FtpClient::with_provider(config, provider);
    if args.get_flag(GLOBAL_ARG_TRACE) {
        client.set_protocol_listener(Arc::new(trace::StderrProtocolTrace::new(
            verbose_level > 2,
        )));
    }

    let Some((subcommand, sub_args)) = args.subcommand() else {
        return Err(anyhow!("no subcommand found"));
    };

    let code = client
        .connect(&host, port)
        .await
        .context(format!("failed to connect to {host}:{port}"))?;
    if !reply_code::is_positive_completion(code) {
        client.disconnect().await;
        return Err(anyhow!("server refused connection with reply code {code}"));
    }
    login(&mut client, &args).await?;

    if args.get_flag(GLOBAL_ARG_ACTIVE) {
        client.enter_local_active_mode();
    } else {
        client.enter_local_passive_mode();
    }
    let file_type = if args.get_flag(GLOBAL_ARG_ASCII) {
        FtpFileType::Ascii(FtpTextFormat::NonPrint)
    } else {
        FtpFileType::Binary
    };
    if !client.set_file_type(file_type).await? {
        return Err(anyhow!(
            "failed to set file type: {}",
            client.reply_string().trim_end()
        ));
    }

    let ret = match subcommand {
        cmd_list::COMMAND => cmd_list::run(&mut client, sub_args).await,
        cmd_nlst::COMMAND => cmd_nlst::run(&mut client, sub_args).await,
        cmd_mlsd::COMMAND => cmd_mlsd::run(&mut client, sub_args).await,
        cmd_stat::COMMAND => cmd_stat::run(&mut client, sub_args).await,
        cmd_get::COMMAND => cmd_get::run(&mut client, sub_args).await,
        cmd_put::COMMAND => cmd_put::run(&mut client, sub_args).await,
        cmd_del::COMMAND => cmd_del::run(&mut client, sub_args).await,
        cmd_rmd::COMMAND => cmd_rmd::run(&mut client, sub_args).await,
        cmd_mkd::COMMAND => cmd_mkd::run(&mut client, sub_args).await,
        cmd_feat::COMMAND => cmd_feat::run(&mut client, sub_args).await,
        cmd_syst::COMMAND => cmd_syst::run(&mut client, sub_args).await,
        cmd => Err(anyhow!("invalid subcommand {cmd}")),
    };

    let _ = client.logout().await;
    client.disconnect().await;

    ret
}

/// Error out with the last reply if the server rejected the command.
fn check_reply(client: &FtpClient, ok: bool, action: &str) -> anyhow::Result<()> {
    if ok {
        Ok(())
    } else {
        Err(anyhow!("{action} failed: {}", client.reply_string().trim_end()))
    }
}
