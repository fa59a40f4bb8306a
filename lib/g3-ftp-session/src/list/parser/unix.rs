/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use regex::Regex;

use super::FtpEntryParser;
use crate::config::FtpListingConfig;
use crate::error::FtpParserResolveError;
use crate::list::{FtpAccess, FtpFile, FtpFileKind, FtpPermission, FtpTimestampParser};

const DEFAULT_DATE_FORMAT: &str = "MMM d yyyy";
const DEFAULT_RECENT_DATE_FORMAT: &str = "MMM d HH:mm";
const NUMERIC_DATE_FORMAT: &str = "yyyy-MM-dd HH:mm";

const UNIX_LIST_PATTERN: &str = concat!(
    r"^([bcdelfmpSs-])",
    r"(((r|-)(w|-)([xsStTL-]))((r|-)(w|-)([xsStTL-]))((r|-)(w|-)([xsStTL-])))\+?\s*",
    // link count
    r"(\d+)\s+",
    // owner and group, both may contain spaces
    r"(?:(\S+(?:\s\S+)*?)\s+)?",
    r"(?:(\S+(?:\s\S+)*)\s+)?",
    // size, or major,minor for devices
    r"(\d+(?:,\s*\d+)?)\s+",
    // yyyy-mm-dd, MMM dd or dd MMM, month names may be non ascii
    r"((?:\d+[-/]\d+[-/]\d+)|(?:\S{3}\s+\d{1,2})|(?:\d{1,2}\s+\S{3}))\s+",
    // year or time
    r"(\d+(?::\d+)?)\s+",
    r"(\S*)(\s*.*)$",
);

/// Parser for `ls -l` style listings.
pub struct UnixEntryParser {
    regex: Regex,
    timestamp: FtpTimestampParser,
    numeric_timestamp: FtpTimestampParser,
    total: Regex,
}

impl UnixEntryParser {
    pub fn new(config: Option<&FtpListingConfig>) -> Result<Self, FtpParserResolveError> {
        let default_config = FtpListingConfig::default();
        let config = config.unwrap_or(&default_config);
        let timestamp = FtpTimestampParser::with_config(
            config,
            DEFAULT_DATE_FORMAT,
            Some(DEFAULT_RECENT_DATE_FORMAT),
        )?;
        let mut numeric_config = config.clone();
        numeric_config.set_default_date_format(NUMERIC_DATE_FORMAT);
        numeric_config.set_recent_date_format(NUMERIC_DATE_FORMAT);
        let numeric_timestamp =
            FtpTimestampParser::with_config(&numeric_config, NUMERIC_DATE_FORMAT, None)?;

        Ok(UnixEntryParser {
            regex: Regex::new(UNIX_LIST_PATTERN)?,
            timestamp,
            numeric_timestamp,
            total: Regex::new(r"^total \d+$")?,
        })
    }
}

impl FtpEntryParser for UnixEntryParser {
    fn parse_entry(&self, entry: &str) -> Option<FtpFile> {
        let caps = self.regex.captures(entry)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        let mut file = FtpFile::new(entry);

        let date = format!("{} {}", group(19)?, group(20)?);
        if let Some(ts) = self
            .timestamp
            .parse_timestamp(&date)
            .or_else(|| self.numeric_timestamp.parse_timestamp(&date))
        {
            file.set_timestamp(ts);
        }

        let mut is_device = false;
        let kind = match group(1)?.as_bytes()[0] {
            b'd' => FtpFileKind::Directory,
            b'e' | b'l' => FtpFileKind::SymbolicLink,
            b'b' | b'c' => {
                is_device = true;
                FtpFileKind::File
            }
            b'f' | b'-' => FtpFileKind::File,
            _ => FtpFileKind::Unknown,
        };
        file.set_kind(kind);

        for (i, access) in [FtpAccess::User, FtpAccess::Group, FtpAccess::World]
            .into_iter()
            .enumerate()
        {
            let g = 4 + i * 4;
            file.set_permission(access, FtpPermission::Read, group(g)? != "-");
            file.set_permission(access, FtpPermission::Write, group(g + 1)? != "-");
            // upper case means the execute bit is not set under setuid or sticky
            let exec = group(g + 2)?;
            let executable = exec != "-" && !exec.starts_with(|c: char| c.is_ascii_uppercase());
            file.set_permission(access, FtpPermission::Execute, executable);
        }

        if !is_device && let Some(Ok(count)) = group(15).map(str::parse) {
            file.set_hard_link_count(count);
        }
        if let Some(user) = group(16) {
            file.set_user(user);
        }
        if let Some(grp) = group(17) {
            file.set_group(grp);
        }
        if let Some(Ok(size)) = group(18).map(str::parse) {
            file.set_size(size);
        }

        let name = format!("{}{}", group(21).unwrap_or_default(), group(22).unwrap_or_default());
        match name.split_once(" -> ") {
            Some((name, link)) if kind == FtpFileKind::SymbolicLink => {
                file.set_name(name);
                file.set_link(link);
            }
            _ => file.set_name(&name),
        }
        Some(file)
    }

    fn pre_parse(&self, entries: &mut Vec<String>) {
        entries.retain(|line| !self.total.is_match(line));
    }
}
