/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::FtpClient;
use crate::connection::{FtpConnectedStream, FtpConnectionProvider};
use crate::control::reply_code;
use crate::error::FtpError;

static PASV_TUPLE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})").ok()
});

/// Find the leftmost `h1,h2,h3,h4,p1,p2` tuple in a 227 reply line.
fn parse_pasv_addr(line: &str) -> Option<SocketAddr> {
    let caps = PASV_TUPLE.as_ref()?.captures(line)?;
    let mut o = [0u8; 6];
    for (i, dst) in o.iter_mut().enumerate() {
        *dst = u8::from_str(caps.get(i + 1)?.as_str()).ok()?;
    }
    let ip = IpAddr::V4(Ipv4Addr::new(o[0], o[1], o[2], o[3]));
    let port = ((o[4] as u16) << 8) | (o[5] as u16);
    Some(SocketAddr::new(ip, port))
}

/// Get the port from a 229 reply line, `(|||port|)` with any delimiter.
fn parse_epsv_port(line: &str) -> Option<u16> {
    let start = memchr::memchr(b'(', line.as_bytes())?;
    let end = start + memchr::memchr(b')', &line.as_bytes()[start..])?;
    let inner = line[start + 1..end].trim();
    let b = inner.as_bytes();
    if b.len() < 5 {
        return None;
    }
    let delim = b[0];
    if b[1] != delim || b[2] != delim || b[b.len() - 1] != delim {
        return None;
    }
    u16::from_str(&inner[3..inner.len() - 1]).ok()
}

/// RFC 1918 for IPv4, the deprecated fec0::/10 for IPv6.
fn is_site_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => ip.is_private(),
        IpAddr::V6(ip) => (ip.segments()[0] & 0xffc0) == 0xfec0,
    }
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// Parse a 227 reply line.
    ///
    /// A site local address is replaced by the control peer address if the
    /// control peer is not site local itself, a NAT box may have rewritten it.
    pub(crate) fn parse_passive_reply(&self, line: &str) -> Result<SocketAddr, FtpError> {
        let (_, remote) = self.control_addrs()?;
        let mut addr = parse_pasv_addr(line).ok_or_else(|| {
            FtpError::MalformedReply(format!("could not parse passive host information: {line}"))
        })?;

        if is_site_local(&addr.ip()) && !is_site_local(&remote.ip()) {
            debug!(
                "replace site local passive address {} with {}",
                addr.ip(),
                remote.ip()
            );
            self.fire_notice(&format!(
                "[Replacing site local address {} with {}]\n",
                addr.ip(),
                remote.ip()
            ));
            addr.set_ip(remote.ip());
        }
        Ok(addr)
    }

    fn parse_extended_passive_reply(&self, line: &str) -> Result<SocketAddr, FtpError> {
        let (_, remote) = self.control_addrs()?;
        let port = parse_epsv_port(line).ok_or_else(|| {
            FtpError::MalformedReply(format!(
                "could not parse extended passive host information: {line}"
            ))
        })?;
        Ok(SocketAddr::new(remote.ip(), port))
    }

    fn first_reply_line(&self) -> String {
        self.reply_lines().first().cloned().unwrap_or_default()
    }

    pub(super) async fn open_passive_data_connection(
        &mut self,
        cmd: &str,
        arg: Option<&str>,
    ) -> Result<Option<FtpConnectedStream<P::Stream>>, FtpError> {
        let (_, remote) = self.control_addrs()?;

        let try_epsv = remote.is_ipv6() || self.config.use_epsv_with_ipv4;
        let server_addr = if try_epsv && self.epsv().await? == reply_code::ENTERING_EPSV_MODE {
            self.parse_extended_passive_reply(&self.first_reply_line())?
        } else {
            if remote.is_ipv6() {
                return Ok(None);
            }
            if try_epsv {
                debug!("EPSV rejected with code {}, fall back to PASV", self.reply_code());
            }
            if self.pasv().await? != reply_code::ENTERING_PASSIVE_MODE {
                return Ok(None);
            }
            self.parse_passive_reply(&self.first_reply_line())?
        };
        self.state.passive_addr = Some(server_addr);

        let connected = tokio::time::timeout(
            self.config.connect_timeout,
            self.provider.new_data_connection(server_addr),
        )
        .await
        .map_err(|_| FtpError::TimedOut("data connection connect"))??;
        debug!(
            "ftp passive data connection {} -> {} established",
            connected.local_addr, connected.peer_addr
        );

        // the data stream is closed when dropped on early return
        if !self.apply_restart_offset().await? {
            return Ok(None);
        }

        let code = self.send_command(cmd, arg).await?;
        if !reply_code::is_positive_preliminary(code) {
            return Ok(None);
        }
        Ok(Some(connected))
    }
}
