/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::{Arc, OnceLock};

use super::FtpEntryParser;
use crate::list::FtpFile;

/// Try each parser in turn, the first one that parses an entry is used for
/// all the following entries.
pub struct CompositeEntryParser {
    parsers: Vec<Arc<dyn FtpEntryParser>>,
    selected: OnceLock<usize>,
}

impl CompositeEntryParser {
    pub fn new(parsers: Vec<Arc<dyn FtpEntryParser>>) -> Self {
        CompositeEntryParser {
            parsers,
            selected: OnceLock::new(),
        }
    }
}

impl FtpEntryParser for CompositeEntryParser {
    fn parse_entry(&self, entry: &str) -> Option<FtpFile> {
        if let Some(i) = self.selected.get() {
            return self.parsers.get(*i)?.parse_entry(entry);
        }
        self.parsers.iter().enumerate().find_map(|(i, p)| {
            let file = p.parse_entry(entry)?;
            let _ = self.selected.set(i);
            Some(file)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{NtEntryParser, UnixEntryParser};

    #[test]
    fn first_match_sticks() {
        let p = CompositeEntryParser::new(vec![
            Arc::new(NtEntryParser::new(None).unwrap()),
            Arc::new(UnixEntryParser::new(None).unwrap()),
        ]);
        let unix = "-rw-r--r--   1 ftp ftp 10 Jun  1  2019 a.txt";
        let nt = "05-26-21  09:17AM                   10 b.txt";

        assert_eq!(p.parse_entry(unix).unwrap().name(), "a.txt");
        // now locked to the unix dialect
        assert!(p.parse_entry(nt).is_none());
    }
}
