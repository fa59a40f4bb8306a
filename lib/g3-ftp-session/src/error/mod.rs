/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::IpAddr;

use thiserror::Error;

mod response;
pub use response::FtpRawResponseError;

mod parser;
pub use parser::{FtpConfigError, FtpParserResolveError};

/// Transport level failures.
///
/// Ordinary protocol rejections never show up here, they are reported as
/// `false` / `None` results with the reply left in the client for inspection.
#[derive(Debug, Error)]
pub enum FtpError {
    #[error("connection is not open")]
    NotConnected,
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
    #[error("malformed server reply: {0}")]
    MalformedReply(String),
    #[error("io failed: {0:?}")]
    Io(#[from] io::Error),
    #[error("{0} timed out")]
    TimedOut(&'static str),
    #[error("host attempting data connection {data} is not same as server {control}")]
    HostMismatch { data: IpAddr, control: IpAddr },
    #[error("unable to determine system type - response: {0}")]
    SystemTypeUnavailable(String),
    #[error("too many list entries, the limit is {0}")]
    TooManyListEntries(usize),
    #[error("parser resolution failed: {0}")]
    ParserResolution(#[from] FtpParserResolveError),
}

impl FtpError {
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, FtpError::ConnectionClosed(_))
    }

    /// Map a socket level error on the control connection.
    pub(crate) fn from_control_io(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof => FtpError::ConnectionClosed(e.to_string()),
            _ => FtpError::Io(e),
        }
    }
}

impl From<FtpRawResponseError> for FtpError {
    fn from(e: FtpRawResponseError) -> Self {
        match e {
            FtpRawResponseError::ReadFailed(e) => FtpError::from_control_io(e),
            FtpRawResponseError::ConnectionClosed => FtpError::ConnectionClosed(e.to_string()),
            FtpRawResponseError::ReadResponseTimedOut(stage) => FtpError::TimedOut(stage),
            FtpRawResponseError::LineTooLong
            | FtpRawResponseError::TruncatedLine(_)
            | FtpRawResponseError::InvalidReplyCode(_)
            | FtpRawResponseError::TooManyLines => FtpError::MalformedReply(e.to_string()),
        }
    }
}
