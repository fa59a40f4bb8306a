/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, SocketAddr};

use super::{FtpClient, FtpFileStructure, FtpFileType, FtpTransferMode};
use crate::connection::FtpConnectionProvider;
use crate::control::FtpCommand;
use crate::data::{format_eprt_arg, format_port_arg};
use crate::error::FtpError;

macro_rules! thin_commands {
    (
        $(
            $(#[$docs:meta])*
            $name:ident => $cmd:ident $(($arg:ident))?;
        )+
    ) => {
        impl<P: FtpConnectionProvider> FtpClient<P> {
        $(
            $(#[$docs])*
            pub async fn $name(&mut self $(, $arg: &str)?) -> Result<u16, FtpError> {
                let args: Option<&str> = None $(.or(Some($arg)))?;
                self.send_command(FtpCommand::$cmd.as_str(), args).await
            }
        )+
        }
    };
}

thin_commands! {
    user => USER(username);
    pass => PASS(password);
    acct => ACCT(account);
    cwd => CWD(dir);
    cdup => CDUP;
    smnt => SMNT(dir);
    rein => REIN;
    quit => QUIT;
    pasv => PASV;
    epsv => EPSV;
    /// Only for server to server transfers, the data connection is not handled here.
    retr => RETR(path);
    /// Only for server to server transfers, the data connection is not handled here.
    stor => STOR(path);
    /// Only for server to server transfers, the data connection is not handled here.
    stou => STOU;
    /// Only for server to server transfers, the data connection is not handled here.
    appe => APPE(path);
    rest => REST(marker);
    rnfr => RNFR(path);
    rnto => RNTO(path);
    abor => ABOR;
    dele => DELE(path);
    rmd => RMD(path);
    mkd => MKD(path);
    pwd => PWD;
    site => SITE(params);
    syst => SYST;
    stat => STAT;
    stat_of => STAT(path);
    help => HELP;
    help_of => HELP(command);
    noop => NOOP;
    feat => FEAT;
    mdtm => MDTM(path);
    size => SIZE(path);
    mlst => MLST(path);
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// PORT for IPv4 or EPRT for IPv6 addresses.
    pub async fn port(&mut self, addr: SocketAddr) -> Result<u16, FtpError> {
        match addr.ip() {
            IpAddr::V4(ip) => {
                let arg = format_port_arg(ip, addr.port());
                self.send_command(FtpCommand::PORT.as_str(), Some(&arg))
                    .await
            }
            IpAddr::V6(_) => self.eprt(addr).await,
        }
    }

    pub async fn eprt(&mut self, addr: SocketAddr) -> Result<u16, FtpError> {
        let arg = format_eprt_arg(addr);
        self.send_command(FtpCommand::EPRT.as_str(), Some(&arg))
            .await
    }

    pub async fn send_type(&mut self, file_type: FtpFileType) -> Result<u16, FtpError> {
        let arg = file_type.command_arg();
        self.send_command(FtpCommand::TYPE.as_str(), Some(&arg))
            .await
    }

    pub async fn stru(&mut self, structure: FtpFileStructure) -> Result<u16, FtpError> {
        self.send_command(FtpCommand::STRU.as_str(), Some(structure.command_arg()))
            .await
    }

    pub async fn mode(&mut self, mode: FtpTransferMode) -> Result<u16, FtpError> {
        self.send_command(FtpCommand::MODE.as_str(), Some(mode.command_arg()))
            .await
    }

    pub async fn allo(&mut self, bytes: u64, record_size: Option<u64>) -> Result<u16, FtpError> {
        let arg = match record_size {
            Some(r) => format!("{bytes} R {r}"),
            None => bytes.to_string(),
        };
        self.send_command(FtpCommand::ALLO.as_str(), Some(&arg))
            .await
    }

    pub async fn mfmt(&mut self, path: &str, time_val: &str) -> Result<u16, FtpError> {
        let arg = format!("{time_val} {path}");
        self.send_command(FtpCommand::MFMT.as_str(), Some(&arg))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use tokio_test::io::Builder;

    use super::*;
    use crate::session::tests::connected_client;

    #[tokio::test]
    async fn formatted_commands() {
        let control = Builder::new()
            .read(b"220 Welcome\r\n")
            .write(b"PORT 192,168,1,2,24,131\r\n")
            .read(b"200 PORT command successful.\r\n")
            .write(b"EPRT |2|2001:db8::1|6275|\r\n")
            .read(b"200 EPRT command successful.\r\n")
            .write(b"TYPE I\r\n")
            .read(b"200 Type set to I.\r\n")
            .write(b"ALLO 1024 R 128\r\n")
            .read(b"202 No storage allocation necessary.\r\n")
            .write(b"MFMT 20211201102030 a.txt\r\n")
            .read(b"213 Modify=20211201102030; a.txt\r\n")
            .write(b"CDUP\r\n")
            .read(b"250 Okay.\r\n")
            .build();
        let mut client = connected_client(control).await;

        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2)), 6275);
        assert_eq!(client.port(addr).await.unwrap(), 200);
        let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)), 6275);
        assert_eq!(client.port(addr).await.unwrap(), 200);
        assert_eq!(client.send_type(FtpFileType::Binary).await.unwrap(), 200);
        assert_eq!(client.allo(1024, Some(128)).await.unwrap(), 202);
        assert_eq!(client.mfmt("a.txt", "20211201102030").await.unwrap(), 213);
        assert_eq!(client.cdup().await.unwrap(), 250);
    }
}
