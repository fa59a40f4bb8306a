/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use log::debug;
use tokio::io::AsyncRead;

use super::filter::FtpFileFilter;
use super::{FtpEntryParser, FtpFile};
use crate::config::FtpTransferConfig;
use crate::control::FtpControlEncoding;
use crate::error::FtpError;
use crate::transfer::FtpLineReader;

/// Holds the raw entries of one listing, parsing them only when asked for.
pub struct FtpListParseEngine {
    parser: Arc<dyn FtpEntryParser>,
    entries: Vec<String>,
    cursor: usize,
}

impl FtpListParseEngine {
    pub fn new(parser: Arc<dyn FtpEntryParser>) -> Self {
        FtpListParseEngine {
            parser,
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Read the whole listing from `stream`, replacing any previous one.
    pub async fn read_server_list<R>(
        &mut self,
        stream: R,
        encoding: FtpControlEncoding,
        config: &FtpTransferConfig,
    ) -> Result<(), FtpError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut reader = FtpLineReader::new(stream, encoding, config);
        self.read_entries(&mut reader, config.list_max_entries)
            .await
    }

    /// A zero `max_entries` means no limit.
    pub(crate) async fn read_entries(
        &mut self,
        reader: &mut FtpLineReader,
        max_entries: usize,
    ) -> Result<(), FtpError> {
        self.entries.clear();
        self.cursor = 0;

        while let Some(entry) = self.parser.read_next_entry(reader).await? {
            if max_entries > 0 && self.entries.len() >= max_entries {
                return Err(FtpError::TooManyListEntries(max_entries));
            }
            self.entries.push(entry);
        }
        self.parser.pre_parse(&mut self.entries);
        debug!("ftp listing read with {} entries", self.entries.len());
        Ok(())
    }

    /// Number of raw entries kept after the pre-parse pass.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse up to `n` entries after the cursor and move the cursor past them.
    ///
    /// Entries that fail to parse show up as `None`.
    pub fn get_next(&mut self, n: usize) -> Vec<Option<FtpFile>> {
        let end = self.cursor.saturating_add(n).min(self.entries.len());
        let page = self.entries[self.cursor..end]
            .iter()
            .map(|e| self.parser.parse_entry(e))
            .collect();
        self.cursor = end;
        page
    }

    /// Parse up to `n` entries before the cursor, in listing order, and move the cursor back.
    pub fn get_previous(&mut self, n: usize) -> Vec<Option<FtpFile>> {
        let start = self.cursor.saturating_sub(n);
        let page = self.entries[start..self.cursor]
            .iter()
            .map(|e| self.parser.parse_entry(e))
            .collect();
        self.cursor = start;
        page
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor < self.entries.len()
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn reset_iterator(&mut self) {
        self.cursor = 0;
    }

    /// Parse every entry, whatever the cursor position, and drop the ones that failed.
    pub fn get_files(&self) -> Vec<FtpFile> {
        self.entries
            .iter()
            .filter_map(|e| self.parser.parse_entry(e))
            .collect()
    }

    pub fn get_files_with<F>(&self, filter: &F) -> Vec<Option<FtpFile>>
    where
        F: FtpFileFilter + ?Sized,
    {
        self.entries
            .iter()
            .map(|e| self.parser.parse_entry(e))
            .filter(|f| filter.accept(f.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{MlsxEntryParser, UnixEntryParser, filter};

    const UNIX_LISTING: &[u8] = b"total 24\r\n\
        drwxr-xr-x   2 ftp ftp 4096 Jan  5  2020 dir1\r\n\
        -rw-r--r--   1 ftp ftp 10 Jan  5  2020 a.txt\r\n\
        this line is garbage\r\n\
        -rw-r--r--   1 ftp ftp 20 Jan  5  2020 b.txt\r\n\
        drwxr-xr-x   2 ftp ftp 4096 Jan  5  2020 dir2\r\n\
        -rw-r--r--   1 ftp ftp 30 Jan  5  2020 c.txt\r\n";

    async fn unix_engine() -> FtpListParseEngine {
        let mut engine = FtpListParseEngine::new(Arc::new(UnixEntryParser::new(None).unwrap()));
        engine
            .read_server_list(
                UNIX_LISTING,
                FtpControlEncoding::default(),
                &FtpTransferConfig::default(),
            )
            .await
            .unwrap();
        engine
    }

    fn names(files: &[Option<FtpFile>]) -> Vec<Option<String>> {
        files
            .iter()
            .map(|f| f.as_ref().map(|f| f.name().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn paging_matches_bulk() {
        let mut engine = unix_engine().await;
        assert_eq!(engine.len(), 6);

        let bulk = engine.get_files_with(&filter::All);
        for k in 1..=7 {
            engine.reset_iterator();
            let mut paged = Vec::new();
            while engine.has_next() {
                let page = engine.get_next(k);
                assert!(!page.is_empty() && page.len() <= k);
                paged.extend(page);
            }
            assert_eq!(names(&paged), names(&bulk));
        }
    }

    #[tokio::test]
    async fn cursor_both_ways() {
        let mut engine = unix_engine().await;
        assert!(!engine.has_previous());
        let first = engine.get_next(4);
        assert_eq!(
            names(&first),
            vec![
                Some("dir1".to_string()),
                Some("a.txt".to_string()),
                None,
                Some("b.txt".to_string()),
            ]
        );
        let back = engine.get_previous(2);
        assert_eq!(names(&back), vec![None, Some("b.txt".to_string())]);
        assert!(engine.has_previous());
        let back = engine.get_previous(10);
        assert_eq!(back.len(), 2);
        assert!(!engine.has_previous());
        assert!(engine.get_previous(1).is_empty());
    }

    #[tokio::test]
    async fn bulk_filters() {
        let mut engine = unix_engine().await;
        engine.get_next(3);

        // the cursor does not matter for bulk reads
        let files = engine.get_files();
        assert_eq!(files.len(), 5);
        let dirs = engine.get_files_with(&filter::Directories);
        assert_eq!(dirs.len(), 2);
        let big = engine.get_files_with(&|f: Option<&FtpFile>| {
            f.map(|f| f.size() >= 20).unwrap_or(true)
        });
        assert_eq!(big.len(), 5);
        assert_eq!(big.iter().filter(|f| f.is_none()).count(), 1);
    }

    #[tokio::test]
    async fn too_many_entries() {
        let mut engine = FtpListParseEngine::new(Arc::new(MlsxEntryParser));
        let config = FtpTransferConfig {
            list_max_entries: 2,
            ..Default::default()
        };
        let r = engine
            .read_server_list(
                &b"type=file; a\r\ntype=file; b\r\ntype=file; c\r\n"[..],
                FtpControlEncoding::default(),
                &config,
            )
            .await;
        assert!(matches!(r, Err(FtpError::TooManyListEntries(2))));
    }
}
