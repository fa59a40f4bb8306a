/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpParserResolveError {
    #[error("parser key cannot be empty")]
    EmptyKey,
    #[error("unknown parser type: {0}")]
    UnknownKey(String),
    #[error("no entry parser is available for {0} listings")]
    UnsupportedDialect(&'static str),
    #[error("invalid parser config: {0}")]
    InvalidConfig(#[from] FtpConfigError),
    #[error("invalid entry pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum FtpConfigError {
    #[error("short month names must have exactly 12 '|' separated tokens: {0}")]
    InvalidShortMonthNames(String),
    #[error("unsupported server time zone {0}")]
    InvalidTimeZone(String),
    #[error("invalid date format pattern {0}: {1}")]
    InvalidDateFormat(String, &'static str),
}
