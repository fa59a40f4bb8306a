/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::FtpControlChannel;
use crate::error::FtpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpCommand(&'static str);

impl FtpCommand {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FtpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FtpCommand {
    fn as_ref(&self) -> &str {
        self.0
    }
}

macro_rules! ftp_commands {
    (
        $(
            $(#[$docs:meta])*
            ($konst:ident, $phrase:expr);
        )+
    ) => {
        impl FtpCommand {
        $(
            $(#[$docs])*
            pub const $konst: FtpCommand = FtpCommand($phrase);
        )+
        }
    };
}

ftp_commands! {
    (USER, "USER");
    (PASS, "PASS");
    (ACCT, "ACCT");
    (CWD, "CWD");
    (CDUP, "CDUP");
    (SMNT, "SMNT");
    (REIN, "REIN");
    (QUIT, "QUIT");
    (PORT, "PORT");
    (PASV, "PASV");
    (TYPE, "TYPE");
    (STRU, "STRU");
    (MODE, "MODE");
    (RETR, "RETR");
    (STOR, "STOR");
    (STOU, "STOU");
    (APPE, "APPE");
    (ALLO, "ALLO");
    (REST, "REST");
    (RNFR, "RNFR");
    (RNTO, "RNTO");
    (ABOR, "ABOR");
    (DELE, "DELE");
    (RMD, "RMD");
    (MKD, "MKD");
    (PWD, "PWD");
    (LIST, "LIST");
    (NLST, "NLST");
    (SITE, "SITE");
    (SYST, "SYST");
    (STAT, "STAT");
    (HELP, "HELP");
    (NOOP, "NOOP");
    /// RFC 2389
    (FEAT, "FEAT");
    (OPTS, "OPTS");
    /// RFC 2428
    (EPRT, "EPRT");
    (EPSV, "EPSV");
    /// RFC 3659
    (MDTM, "MDTM");
    (SIZE, "SIZE");
    (MLSD, "MLSD");
    (MLST, "MLST");
    /// draft-somers-ftp-mfxx
    (MFMT, "MFMT");
}

fn build_message(cmd: &str, args: Option<&str>) -> String {
    match args {
        Some(args) => {
            let mut buf = String::with_capacity(cmd.len() + 1 + args.len() + 2);
            buf.push_str(cmd);
            buf.push(' ');
            buf.push_str(args);
            buf.push_str("\r\n");
            buf
        }
        None => {
            let mut buf = String::with_capacity(cmd.len() + 2);
            buf.push_str(cmd);
            buf.push_str("\r\n");
            buf
        }
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn send_all(&mut self, msg: &str) -> Result<(), FtpError> {
        #[cfg(feature = "log-raw-io")]
        crate::debug::log_cmd(msg.trim_end());

        let buf = self.encoding.encode(msg);
        let timeout = self.config.command_timeout;
        let write = async {
            self.stream.write_all(&buf).await?;
            self.stream.flush().await
        };
        match tokio::time::timeout(timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(FtpError::from_control_io(e)),
            Err(_) => Err(FtpError::TimedOut("send command")),
        }
    }

    /// Send the command and read the reply, returns the reply code.
    pub(crate) async fn send_command(
        &mut self,
        cmd: &str,
        args: Option<&str>,
    ) -> Result<u16, FtpError> {
        let msg = build_message(cmd, args);
        self.send_all(&msg).await?;
        self.listener.command_sent(cmd, &msg);
        self.read_reply().await
    }

    /// Send a NOOP without notifying the listener, the reply is not read.
    pub(crate) async fn send_quiet_noop(&mut self) -> Result<(), FtpError> {
        let msg = build_message(FtpCommand::NOOP.as_str(), None);
        self.send_all(&msg).await
    }
}
