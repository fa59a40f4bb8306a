/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::IpAddr;
use std::time::Duration;

use crate::control::FtpControlEncoding;

mod listing;
pub use listing::FtpListingConfig;

mod overrides;
pub use overrides::SystemTypeOverrides;

#[cfg(feature = "yaml")]
mod yaml;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpControlConfig {
    pub max_line_len: usize,
    pub max_multi_lines: usize,
    /// only accept `DDD ` with the same code as the end of a multi-line reply
    pub strict_multiline: bool,
    pub command_timeout: Duration,
    pub encoding: FtpControlEncoding,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: 2048,
            max_multi_lines: 1024,
            strict_multiline: false,
            command_timeout: Duration::from_secs(60),
            encoding: FtpControlEncoding::Latin1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpTransferConfig {
    pub buffer_size: usize,
    /// used for active mode accept and for each data socket read / write
    pub data_timeout: Option<Duration>,
    pub list_max_line_len: usize,
    pub list_max_entries: usize,
    /// idle time before a NOOP is sent on the control channel during transfer
    pub control_keepalive_timeout: Option<Duration>,
    pub control_keepalive_reply_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            buffer_size: 16384,
            data_timeout: None,
            list_max_line_len: 2048,
            list_max_entries: 65536,
            control_keepalive_timeout: None,
            control_keepalive_reply_timeout: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    /// for both the control connection and passive data connections
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
    pub use_epsv_with_ipv4: bool,
    pub remote_verification: bool,
    pub autodetect_utf8: bool,
    /// inclusive local port range for active mode, `(0, 0)` lets the OS choose
    pub active_port_range: (u16, u16),
    pub active_external_ip: Option<IpAddr>,
    pub report_active_external_ip: Option<IpAddr>,
    pub list_hidden_files: bool,
    /// skip SYST and use this system type for parser autodetection
    pub system_type: Option<String>,
    /// the system type to use if SYST fails
    pub default_system_type: Option<String>,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: Duration::from_secs(30),
            greeting_timeout: Duration::from_secs(30),
            use_epsv_with_ipv4: false,
            remote_verification: true,
            autodetect_utf8: false,
            active_port_range: (0, 0),
            active_external_ip: None,
            report_active_external_ip: None,
            list_hidden_files: false,
            system_type: None,
            default_system_type: None,
        }
    }
}

impl FtpClientConfig {
    /// Set the inclusive local port range for active mode, `(0, 0)` lets the OS choose.
    pub fn set_active_port_range(&mut self, min: u16, max: u16) {
        self.active_port_range = (min, max);
    }

    #[inline]
    pub fn active_port_range(&self) -> (u16, u16) {
        self.active_port_range
    }
}
