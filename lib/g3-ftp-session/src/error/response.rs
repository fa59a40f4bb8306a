/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpRawResponseError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("connection closed without indication")]
    ConnectionClosed,
    #[error("line too long")]
    LineTooLong,
    #[error("truncated server reply: '{0}'")]
    TruncatedLine(String),
    #[error("could not parse reply code from server reply: '{0}'")]
    InvalidReplyCode(String),
    #[error("too many lines")]
    TooManyLines,
    #[error("read response for stage '{0}' timed out")]
    ReadResponseTimedOut(&'static str),
}
