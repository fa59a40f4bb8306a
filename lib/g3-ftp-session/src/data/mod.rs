/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use log::warn;

use crate::FtpClient;
use crate::connection::{FtpConnectedStream, FtpConnectionProvider};
use crate::error::FtpError;
use crate::session::DataConnectionMode;

mod active;
pub(crate) use active::{format_eprt_arg, format_port_arg};

mod passive;

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// Negotiate and open the data connection, then send `cmd`.
    ///
    /// Returns `None` if any step is rejected by the server, or if the
    /// client is in one of the remote modes.
    pub(crate) async fn open_data_connection(
        &mut self,
        cmd: &str,
        arg: Option<&str>,
    ) -> Result<Option<P::Stream>, FtpError> {
        let (_, remote) = self.control_addrs()?;

        let connected = match self.state.data_mode {
            DataConnectionMode::ActiveLocal => self.open_active_data_connection(cmd, arg).await?,
            DataConnectionMode::PassiveLocal => self.open_passive_data_connection(cmd, arg).await?,
            DataConnectionMode::ActiveRemote | DataConnectionMode::PassiveRemote => return Ok(None),
        };
        let Some(FtpConnectedStream {
            stream, peer_addr, ..
        }) = connected
        else {
            return Ok(None);
        };

        if self.state.remote_verification && peer_addr.ip() != remote.ip() {
            warn!(
                "data connection peer {} is not the control peer {}",
                peer_addr.ip(),
                remote.ip()
            );
            drop(stream);
            return Err(FtpError::HostMismatch {
                data: peer_addr.ip(),
                control: remote.ip(),
            });
        }

        Ok(Some(stream))
    }

    /// Send REST if a restart offset is set, `false` if rejected.
    async fn apply_restart_offset(&mut self) -> Result<bool, FtpError> {
        let offset = self.state.restart_offset;
        if offset > 0 {
            self.restart(offset).await
        } else {
            Ok(true)
        }
    }
}
