/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;
use std::str::FromStr;

/// Character encoding of the control channel and of text listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpControlEncoding {
    /// ISO-8859-1, every byte maps to one char
    #[default]
    Latin1,
    Utf8,
}

impl FtpControlEncoding {
    pub fn encode(&self, s: &str) -> Vec<u8> {
        match self {
            FtpControlEncoding::Latin1 => s
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            FtpControlEncoding::Utf8 => s.as_bytes().to_vec(),
        }
    }

    pub fn decode(&self, buf: &[u8]) -> String {
        match self {
            FtpControlEncoding::Latin1 => buf.iter().map(|b| char::from(*b)).collect(),
            FtpControlEncoding::Utf8 => String::from_utf8_lossy(buf).into_owned(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpControlEncoding::Latin1 => "ISO-8859-1",
            FtpControlEncoding::Utf8 => "UTF-8",
        }
    }
}

impl fmt::Display for FtpControlEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FtpControlEncoding {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(FtpControlEncoding::Latin1),
            "utf8" | "utf-8" => Ok(FtpControlEncoding::Utf8),
            _ => Err(()),
        }
    }
}
