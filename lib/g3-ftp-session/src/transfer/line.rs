/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, BufReader};

use super::copy::with_data_timeout;
use crate::config::FtpTransferConfig;
use crate::control::FtpControlEncoding;
use crate::error::FtpError;
use crate::io::LimitedBufReadExt;

/// Line reader over a listing data connection.
pub struct FtpLineReader {
    io: BufReader<Box<dyn AsyncRead + Unpin + Send>>,
    encoding: FtpControlEncoding,
    max_line_len: usize,
    data_timeout: Option<Duration>,
    line_buf: Vec<u8>,
    read_lines: usize,
}

impl FtpLineReader {
    pub fn new<R>(reader: R, encoding: FtpControlEncoding, config: &FtpTransferConfig) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        FtpLineReader {
            io: BufReader::with_capacity(config.buffer_size.max(1), Box::new(reader)),
            encoding,
            max_line_len: config.list_max_line_len,
            data_timeout: config.data_timeout,
            line_buf: Vec::with_capacity(256),
            read_lines: 0,
        }
    }

    /// Number of lines returned so far.
    #[inline]
    pub fn read_lines(&self) -> usize {
        self.read_lines
    }

    /// Read the next line without the line terminator, `None` at the end of data.
    pub async fn read_line(&mut self) -> Result<Option<String>, FtpError> {
        self.line_buf.clear();
        let (found, len) = with_data_timeout(
            self.data_timeout,
            "list data read",
            self.io
                .limited_read_until(b'\n', self.max_line_len, &mut self.line_buf),
        )
        .await?;
        if len == 0 {
            return Ok(None);
        }
        if !found && len >= self.max_line_len {
            return Err(FtpError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("list line {} is too long", self.read_lines + 1),
            )));
        }

        let mut end = self.line_buf.len();
        if self.line_buf.ends_with(b"\n") {
            end -= 1;
        }
        if self.line_buf[..end].ends_with(b"\r") {
            end -= 1;
        }
        self.read_lines += 1;
        Ok(Some(self.encoding.decode(&self.line_buf[..end])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines() {
        let data: &[u8] = b"one\r\ntwo\nthr\xe9e";
        let mut reader =
            FtpLineReader::new(data, FtpControlEncoding::Latin1, &FtpTransferConfig::default());
        assert_eq!(reader.read_line().await.unwrap().unwrap(), "one");
        assert_eq!(reader.read_line().await.unwrap().unwrap(), "two");
        assert_eq!(reader.read_line().await.unwrap().unwrap(), "thr\u{e9}e");
        assert!(reader.read_line().await.unwrap().is_none());
        assert_eq!(reader.read_lines(), 3);
    }

    #[tokio::test]
    async fn too_long() {
        let data: &[u8] = b"0123456789\n";
        let config = FtpTransferConfig {
            list_max_line_len: 4,
            ..Default::default()
        };
        let mut reader = FtpLineReader::new(data, FtpControlEncoding::Utf8, &config);
        assert!(reader.read_line().await.is_err());
    }
}
