/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use log::debug;

use crate::FtpClient;
use crate::connection::{FtpConnectedStream, FtpConnectionProvider, FtpDataListener};
use crate::control::reply_code;
use crate::error::FtpError;

/// The PORT argument, `h1,h2,h3,h4,p1,p2`.
pub(crate) fn format_port_arg(ip: Ipv4Addr, port: u16) -> String {
    let o = ip.octets();
    format!(
        "{},{},{},{},{},{}",
        o[0],
        o[1],
        o[2],
        o[3],
        port >> 8,
        port & 0xff
    )
}

/// The EPRT argument, `|1|ip|port|` or `|2|ip|port|`.
pub(crate) fn format_eprt_arg(addr: SocketAddr) -> String {
    match addr.ip() {
        IpAddr::V4(ip) => format!("|1|{ip}|{}|", addr.port()),
        IpAddr::V6(ip) => {
            // drop a %zone suffix
            let ip = ip.to_string();
            let ip = ip.split_once('%').map(|(ip, _)| ip).unwrap_or(&ip);
            format!("|2|{ip}|{}|", addr.port())
        }
    }
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// A random port in the configured range, or 0 to let the OS choose.
    fn active_port(&self) -> u16 {
        let (min, max) = self.config.active_port_range();
        if min > 0 && max >= min {
            fastrand::u16(min..=max)
        } else {
            0
        }
    }

    pub(super) async fn open_active_data_connection(
        &mut self,
        cmd: &str,
        arg: Option<&str>,
    ) -> Result<Option<FtpConnectedStream<P::Stream>>, FtpError> {
        let (local, remote) = self.control_addrs()?;
        let bind_ip = self.config.active_external_ip.unwrap_or(local.ip());
        let report_ip = self.config.report_active_external_ip.unwrap_or(bind_ip);

        let bind_addr = SocketAddr::new(bind_ip, self.active_port());
        // the listener is closed when it goes out of scope, accepted or not
        let mut listener = self.provider.new_data_listener(bind_addr).await?;
        let listen_addr = listener.local_addr()?;
        debug!("ftp active data listener bound to {listen_addr}");

        let report_addr = SocketAddr::new(report_ip, listen_addr.port());
        let code = if remote.is_ipv6() {
            self.eprt(report_addr).await?
        } else {
            self.port(report_addr).await?
        };
        if !reply_code::is_positive_completion(code) {
            return Ok(None);
        }

        if !self.apply_restart_offset().await? {
            return Ok(None);
        }

        let code = self.send_command(cmd, arg).await?;
        if !reply_code::is_positive_preliminary(code) {
            return Ok(None);
        }

        let connected = match self.config.transfer.data_timeout {
            Some(timeout) => tokio::time::timeout(timeout, listener.accept())
                .await
                .map_err(|_| FtpError::TimedOut("data connection accept"))??,
            None => listener.accept().await?,
        };
        Ok(Some(connected))
    }
}
