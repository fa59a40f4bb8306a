/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::SocketAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{DataConnectionMode, FtpClient, FtpFileStructure, FtpFileType, FtpTransferMode};
use crate::connection::FtpConnectionProvider;
use crate::control::reply_code;
use crate::error::FtpError;
use crate::time_val;

/// Get the quoted pathname, a doubled quote is an escaped quote.
fn parse_pathname(reply: &str) -> Option<String> {
    let start = reply.find('"')? + 1;
    let mut path = String::new();
    let mut chars = reply[start..].chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Some(path);
            }
        } else {
            path.push(c);
        }
    }
    None
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// USER, then PASS if the server asks for it.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool, FtpError> {
        let code = self.user(username).await?;
        if reply_code::is_positive_completion(code) {
            return Ok(true);
        }
        if !reply_code::is_positive_intermediate(code) {
            return Ok(false);
        }

        let code = self.pass(password).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// USER, PASS and ACCT, each only sent when the previous reply asks for more.
    pub async fn login_with_account(
        &mut self,
        username: &str,
        password: &str,
        account: &str,
    ) -> Result<bool, FtpError> {
        let code = self.user(username).await?;
        if reply_code::is_positive_completion(code) {
            return Ok(true);
        }
        if !reply_code::is_positive_intermediate(code) {
            return Ok(false);
        }

        let code = self.pass(password).await?;
        if reply_code::is_positive_completion(code) {
            return Ok(true);
        }
        if !reply_code::is_positive_intermediate(code) {
            return Ok(false);
        }

        let code = self.acct(account).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn logout(&mut self) -> Result<bool, FtpError> {
        let code = self.quit().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Send REIN and reset the session state on success.
    pub async fn reinitialize(&mut self) -> Result<bool, FtpError> {
        let mut code = self.rein().await?;
        if reply_code::is_positive_preliminary(code) {
            code = self.control_mut()?.read_reply().await?;
        }
        if reply_code::is_positive_completion(code) {
            self.state.reset();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn change_working_directory(&mut self, path: &str) -> Result<bool, FtpError> {
        let code = self.cwd(path).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn change_to_parent_directory(&mut self) -> Result<bool, FtpError> {
        let code = self.cdup().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn structure_mount(&mut self, path: &str) -> Result<bool, FtpError> {
        let code = self.smnt(path).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Returns `None` if PWD is rejected or the reply has no quoted path.
    pub async fn print_working_directory(&mut self) -> Result<Option<String>, FtpError> {
        let code = self.pwd().await?;
        if code != reply_code::PATHNAME_CREATED {
            return Ok(None);
        }
        Ok(parse_pathname(&self.reply_string()))
    }

    pub async fn set_file_type(&mut self, file_type: FtpFileType) -> Result<bool, FtpError> {
        let code = self.send_type(file_type).await?;
        if reply_code::is_positive_completion(code) {
            self.state.file_type = file_type;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn set_file_structure(&mut self, structure: FtpFileStructure) -> Result<bool, FtpError> {
        let code = self.stru(structure).await?;
        if reply_code::is_positive_completion(code) {
            self.state.file_structure = structure;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn set_file_transfer_mode(&mut self, mode: FtpTransferMode) -> Result<bool, FtpError> {
        let code = self.mode(mode).await?;
        if reply_code::is_positive_completion(code) {
            self.state.transfer_mode = mode;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// The server connects to us for each data connection, this is the default.
    pub fn enter_local_active_mode(&mut self) {
        self.state.data_mode = DataConnectionMode::ActiveLocal;
        self.state.passive_addr = None;
    }

    /// We connect to the server for each data connection, PASV / EPSV is sent
    /// before each transfer.
    pub fn enter_local_passive_mode(&mut self) {
        self.state.data_mode = DataConnectionMode::PassiveLocal;
        self.state.passive_addr = None;
    }

    /// Tell the server to connect to `addr` for the next server to server transfer.
    pub async fn enter_remote_active_mode(&mut self, addr: SocketAddr) -> Result<bool, FtpError> {
        let code = self.port(addr).await?;
        if reply_code::is_positive_completion(code) {
            self.state.data_mode = DataConnectionMode::ActiveRemote;
            self.state.passive_addr = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Send PASV for the next server to server transfer.
    ///
    /// The address the server listens on is then available from
    /// [`SessionState::passive_addr`](super::SessionState::passive_addr).
    pub async fn enter_remote_passive_mode(&mut self) -> Result<bool, FtpError> {
        let code = self.pasv().await?;
        if code != reply_code::ENTERING_PASSIVE_MODE {
            return Ok(false);
        }

        self.state.data_mode = DataConnectionMode::PassiveRemote;
        let line = self.reply_lines().first().cloned().unwrap_or_default();
        let addr = self.parse_passive_reply(&line)?;
        self.state.passive_addr = Some(addr);
        Ok(true)
    }

    fn in_remote_mode(&self) -> bool {
        matches!(
            self.state.data_mode,
            DataConnectionMode::ActiveRemote | DataConnectionMode::PassiveRemote
        )
    }

    /// RETR in a remote mode, call [`FtpClient::complete_pending_command`] afterwards.
    pub async fn remote_retrieve(&mut self, path: &str) -> Result<bool, FtpError> {
        if !self.in_remote_mode() {
            return Ok(false);
        }
        let code = self.retr(path).await?;
        Ok(reply_code::is_positive_preliminary(code))
    }

    pub async fn remote_store(&mut self, path: &str) -> Result<bool, FtpError> {
        if !self.in_remote_mode() {
            return Ok(false);
        }
        let code = self.stor(path).await?;
        Ok(reply_code::is_positive_preliminary(code))
    }

    /// STOU, with a suggested name if given.
    pub async fn remote_store_unique(&mut self, path: Option<&str>) -> Result<bool, FtpError> {
        if !self.in_remote_mode() {
            return Ok(false);
        }
        let code = match path {
            Some(path) => self.send_command("STOU", Some(path)).await?,
            None => self.stou().await?,
        };
        Ok(reply_code::is_positive_preliminary(code))
    }

    pub async fn remote_append(&mut self, path: &str) -> Result<bool, FtpError> {
        if !self.in_remote_mode() {
            return Ok(false);
        }
        let code = self.appe(path).await?;
        Ok(reply_code::is_positive_preliminary(code))
    }

    /// Read the final reply of a transfer started by a streaming or remote call.
    ///
    /// This must be called once the data stream is closed, or the next
    /// command will get this reply.
    pub async fn complete_pending_command(&mut self) -> Result<bool, FtpError> {
        let code = self.control_mut()?.read_reply().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Send REST with `offset` and clear the restart offset.
    pub(crate) async fn restart(&mut self, offset: u64) -> Result<bool, FtpError> {
        self.state.restart_offset = 0;
        let code = self.rest(&offset.to_string()).await?;
        Ok(reply_code::is_positive_intermediate(code))
    }

    pub async fn rename(&mut self, from: &str, to: &str) -> Result<bool, FtpError> {
        let code = self.rnfr(from).await?;
        if !reply_code::is_positive_intermediate(code) {
            return Ok(false);
        }
        let code = self.rnto(to).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Send ABOR, a transfer in progress should be stopped first.
    pub async fn abort(&mut self) -> Result<bool, FtpError> {
        let code = self.abor().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn delete_file(&mut self, path: &str) -> Result<bool, FtpError> {
        let code = self.dele(path).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn remove_directory(&mut self, path: &str) -> Result<bool, FtpError> {
        let code = self.rmd(path).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn make_directory(&mut self, path: &str) -> Result<bool, FtpError> {
        let code = self.mkd(path).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn send_site_command(&mut self, args: &str) -> Result<bool, FtpError> {
        let code = self.site(args).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn send_noop(&mut self) -> Result<bool, FtpError> {
        let code = self.noop().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn allocate(&mut self, bytes: u64) -> Result<bool, FtpError> {
        let code = self.allo(bytes, None).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn allocate_records(&mut self, bytes: u64, record_size: u64) -> Result<bool, FtpError> {
        let code = self.allo(bytes, Some(record_size)).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    fn reply_text_if(&self, ok: bool) -> Option<String> {
        ok.then(|| self.reply_string())
    }

    /// The full STAT reply text.
    pub async fn get_status(&mut self) -> Result<Option<String>, FtpError> {
        let code = self.stat().await?;
        Ok(self.reply_text_if(reply_code::is_positive_completion(code)))
    }

    pub async fn get_status_of(&mut self, path: &str) -> Result<Option<String>, FtpError> {
        let code = self.stat_of(path).await?;
        Ok(self.reply_text_if(reply_code::is_positive_completion(code)))
    }

    pub async fn list_help(&mut self) -> Result<Option<String>, FtpError> {
        let code = self.help().await?;
        Ok(self.reply_text_if(reply_code::is_positive_completion(code)))
    }

    pub async fn list_help_for(&mut self, command: &str) -> Result<Option<String>, FtpError> {
        let code = self.help_of(command).await?;
        Ok(self.reply_text_if(reply_code::is_positive_completion(code)))
    }

    /// The raw MDTM reply text.
    pub async fn get_modification_time(&mut self, path: &str) -> Result<Option<String>, FtpError> {
        let code = self.mdtm(path).await?;
        Ok(self.reply_text_if(reply_code::is_positive_completion(code)))
    }

    /// The MDTM time-val parsed as UTC.
    pub async fn modification_time(&mut self, path: &str) -> Result<Option<DateTime<Utc>>, FtpError> {
        let code = self.mdtm(path).await?;
        if !reply_code::is_positive_completion(code) {
            return Ok(None);
        }
        let message = self.reply().map(|r| r.message().trim()).unwrap_or_default();
        time_val::parse_from_str(message)
            .map(Some)
            .map_err(|e| FtpError::MalformedReply(format!("invalid MDTM time-val {message}: {e}")))
    }

    /// Set the modification time with MFMT, `time_val` is `YYYYMMDDhhmmss` in UTC.
    pub async fn set_modification_time(&mut self, path: &str, time_val: &str) -> Result<bool, FtpError> {
        let code = self.mfmt(path, time_val).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    pub async fn set_modification_datetime(
        &mut self,
        path: &str,
        dt: &DateTime<Utc>,
    ) -> Result<bool, FtpError> {
        self.set_modification_time(path, &time_val::format(dt)).await
    }

    /// The SIZE reply, note that it depends on the current file type.
    pub async fn file_size(&mut self, path: &str) -> Result<Option<u64>, FtpError> {
        let code = self.size(path).await?;
        if code != reply_code::FILE_STATUS {
            return Ok(None);
        }
        let message = self.reply().map(|r| r.message().trim()).unwrap_or_default();
        u64::from_str(message)
            .map(Some)
            .map_err(|_| FtpError::MalformedReply(format!("invalid SIZE value {message}")))
    }

    /// The SYST result, cached for the connection.
    ///
    /// Falls back to the configured default system type if SYST is rejected.
    pub async fn get_system_type(&mut self) -> Result<String, FtpError> {
        if let Some(s) = &self.state.system_type {
            return Ok(s.clone());
        }

        let code = self.syst().await?;
        let system = if reply_code::is_positive_completion(code) {
            self.reply()
                .map(|r| r.message().to_string())
                .unwrap_or_default()
        } else if let Some(s) = &self.config.default_system_type {
            s.clone()
        } else {
            return Err(FtpError::SystemTypeUnavailable(self.reply_string()));
        };
        self.state.system_type = Some(system.clone());
        Ok(system)
    }
}
