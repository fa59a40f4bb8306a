/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use regex::Regex;

use super::FtpEntryParser;
use crate::config::FtpListingConfig;
use crate::error::FtpParserResolveError;
use crate::list::{FtpFile, FtpFileKind, FtpTimestampParser, system_key};

const DEFAULT_DATE_FORMAT: &str = "MM-dd-yy hh:mma";
const DEFAULT_DATE_FORMAT_24H: &str = "MM-dd-yy kk:mm";

const NT_LIST_PATTERN: &str = r"^(\S+)\s+(\S+)\s+(?:(<DIR>)|([0-9]+))\s+(\S.*)$";

/// Parser for Windows / IIS style listings.
pub struct NtEntryParser {
    regex: Regex,
    timestamp: FtpTimestampParser,
    timestamp_24h: FtpTimestampParser,
}

impl NtEntryParser {
    pub fn new(config: Option<&FtpListingConfig>) -> Result<Self, FtpParserResolveError> {
        let default_config = FtpListingConfig::new(system_key::WINDOWS);
        let config = config.unwrap_or(&default_config);
        let timestamp = FtpTimestampParser::with_config(config, DEFAULT_DATE_FORMAT, None)?;

        let mut config_24h = config.clone();
        config_24h.set_default_date_format(DEFAULT_DATE_FORMAT_24H);
        let timestamp_24h =
            FtpTimestampParser::with_config(&config_24h, DEFAULT_DATE_FORMAT_24H, None)?;

        Ok(NtEntryParser {
            regex: Regex::new(NT_LIST_PATTERN)?,
            timestamp,
            timestamp_24h,
        })
    }
}

impl FtpEntryParser for NtEntryParser {
    fn parse_entry(&self, entry: &str) -> Option<FtpFile> {
        let caps = self.regex.captures(entry)?;

        let name = caps.get(5)?.as_str();
        if name == "." || name == ".." {
            return None;
        }

        let mut file = FtpFile::new(entry);
        file.set_name(name);

        let date = format!("{} {}", caps.get(1)?.as_str(), caps.get(2)?.as_str());
        if let Some(ts) = self
            .timestamp
            .parse_timestamp(&date)
            .or_else(|| self.timestamp_24h.parse_timestamp(&date))
        {
            file.set_timestamp(ts);
        }

        if caps.get(3).is_some() {
            file.set_kind(FtpFileKind::Directory);
            file.set_size(0);
        } else {
            file.set_kind(FtpFileKind::File);
            if let Some(Ok(size)) = caps.get(4).map(|m| m.as_str().parse()) {
                file.set_size(size);
            }
        }
        Some(file)
    }
}
