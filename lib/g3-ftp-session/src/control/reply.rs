/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use super::{FtpControlChannel, reply_code};
use crate::error::{FtpError, FtpRawResponseError};
use crate::io::LimitedBufReadExt;

const REPLY_CODE_LEN: usize = 3;

/// A complete reply, single or multi line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FtpReply {
    code: u16,
    lines: Vec<String>,
}

impl FtpReply {
    pub(crate) fn new(code: u16, lines: Vec<String>) -> Self {
        FtpReply { code, lines }
    }

    /// 0 if no reply has been received yet
    #[inline]
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The raw lines, reply code included, line terminators stripped.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The raw text with every line terminated by CRLF.
    pub fn text(&self) -> String {
        let len = self.lines.iter().map(|l| l.len() + 2).sum();
        let mut s = String::with_capacity(len);
        for line in &self.lines {
            s.push_str(line);
            s.push_str("\r\n");
        }
        s
    }

    pub fn last_line(&self) -> &str {
        self.lines.last().map(|s| s.as_str()).unwrap_or_default()
    }

    /// The text of the last line, without the reply code.
    pub fn message(&self) -> &str {
        self.last_line().get(REPLY_CODE_LEN + 1..).unwrap_or_default()
    }
}

fn parse_reply_code(line: &str) -> Result<u16, FtpRawResponseError> {
    let b = line.as_bytes();
    if b.len() < REPLY_CODE_LEN {
        return Err(FtpRawResponseError::TruncatedLine(line.to_string()));
    }
    if !b[..REPLY_CODE_LEN].iter().all(|c| c.is_ascii_digit()) {
        return Err(FtpRawResponseError::InvalidReplyCode(line.to_string()));
    }
    Ok(b[..REPLY_CODE_LEN]
        .iter()
        .fold(0u16, |acc, c| acc * 10 + (c - b'0') as u16))
}

pub(super) struct FtpMultiLineReplyParser {
    code: u16,
    end_prefix: [u8; 4],
    strict: bool,
    lines: Vec<String>,
}

impl FtpMultiLineReplyParser {
    fn new(code: u16, first_line: String, strict: bool) -> Self {
        let b = first_line.as_bytes();
        let end_prefix = [b[0], b[1], b[2], b' '];
        FtpMultiLineReplyParser {
            code,
            end_prefix,
            strict,
            lines: vec![first_line],
        }
    }

    fn is_end_line(&self, line: &str) -> bool {
        let b = line.as_bytes();
        if self.strict {
            b.starts_with(&self.end_prefix)
        } else {
            // any digit led line that is not a continuation
            b.len() > REPLY_CODE_LEN && b[REPLY_CODE_LEN] != b'-' && b[0].is_ascii_digit()
        }
    }

    pub(super) fn feed_line(&mut self, line: String) -> bool {
        let end = self.is_end_line(&line);
        // do not trim whitespace at beginning
        self.lines.push(line);
        end
    }

    pub(super) fn finish(self) -> FtpReply {
        FtpReply::new(self.code, self.lines)
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<String>, FtpRawResponseError> {
        buf.clear();

        let (found, len) = self
            .stream
            .limited_read_until(b'\n', self.config.max_line_len, buf)
            .await
            .map_err(FtpRawResponseError::ReadFailed)?;
        if len == 0 {
            return Ok(None);
        }
        if !found && len >= self.config.max_line_len {
            return Err(FtpRawResponseError::LineTooLong);
        }

        let mut end = buf.len();
        if buf[..end].ends_with(b"\n") {
            end -= 1;
        }
        if buf[..end].ends_with(b"\r") {
            end -= 1;
        }
        let line = self.encoding.decode(&buf[..end]);

        #[cfg(feature = "log-raw-io")]
        crate::debug::log_rsp(&line);

        Ok(Some(line))
    }

    pub(super) async fn read_raw_reply(&mut self) -> Result<FtpReply, FtpRawResponseError> {
        let mut buf = Vec::<u8>::with_capacity(256);
        let Some(line) = self.read_line(&mut buf).await? else {
            return Err(FtpRawResponseError::ConnectionClosed);
        };
        let code = parse_reply_code(&line)?;

        if line.as_bytes().get(REPLY_CODE_LEN) != Some(&b'-') {
            return Ok(FtpReply::new(code, vec![line]));
        }

        let mut ml_parser = FtpMultiLineReplyParser::new(code, line, self.config.strict_multiline);
        for _i in 0..self.config.max_multi_lines {
            let Some(line) = self.read_line(&mut buf).await? else {
                return Err(FtpRawResponseError::ConnectionClosed);
            };
            if ml_parser.feed_line(line) {
                return Ok(ml_parser.finish());
            }
        }
        Err(FtpRawResponseError::TooManyLines)
    }

    async fn timed_read_raw_reply(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpReply, FtpRawResponseError> {
        match tokio::time::timeout(self.config.command_timeout, self.read_raw_reply()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }

    async fn read_reply_inner(&mut self, report: bool) -> Result<u16, FtpError> {
        let reply = self.timed_read_raw_reply("read reply").await?;
        let code = reply.code();
        self.reply = reply;

        if report {
            self.listener.reply_received(code, &self.reply.text());
        }

        if code == reply_code::SERVICE_NOT_AVAILABLE {
            return Err(FtpError::ConnectionClosed(
                "FTP response 421 received, server closed connection".to_string(),
            ));
        }
        Ok(code)
    }

    /// Read the next reply and notify the listener.
    pub(crate) async fn read_reply(&mut self) -> Result<u16, FtpError> {
        self.read_reply_inner(true).await
    }

    /// Read the next reply without notifying the listener.
    pub(crate) async fn read_reply_quiet(&mut self) -> Result<u16, FtpError> {
        self.read_reply_inner(false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tokio_test::io::Builder;

    use crate::FtpControlConfig;
    use crate::control::FtpProtocolListener;

    #[derive(Default)]
    struct RecordListener {
        events: Mutex<Vec<String>>,
    }

    impl FtpProtocolListener for RecordListener {
        fn command_sent(&self, command: &str, _message: &str) {
            self.events.lock().unwrap().push(format!("> {command}"));
        }

        fn reply_received(&self, code: u16, _message: &str) {
            self.events.lock().unwrap().push(format!("< {code}"));
        }
    }

    fn channel(data: &[u8], strict: bool) -> FtpControlChannel<tokio_test::io::Mock> {
        let stream = Builder::new().read(data).build();
        let config = FtpControlConfig {
            strict_multiline: strict,
            ..Default::default()
        };
        FtpControlChannel::new(stream, config)
    }

    #[tokio::test]
    async fn single_line() {
        let mut ctl = channel(b"200 Command okay.\r\n", false);
        let code = ctl.read_reply().await.unwrap();
        assert_eq!(code, 200);
        assert_eq!(ctl.reply().lines(), ["200 Command okay."]);
        assert_eq!(ctl.reply().text(), "200 Command okay.\r\n");
        assert_eq!(ctl.reply().message(), "Command okay.");
    }

    #[tokio::test]
    async fn code_only() {
        let mut ctl = channel(b"200\r\n", false);
        assert_eq!(ctl.read_reply().await.unwrap(), 200);
        assert_eq!(ctl.reply().message(), "");
    }

    #[tokio::test]
    async fn multi_line_strict() {
        let data = b"211-Features:\r\n MDTM\r\n 211 not the end\r\n SIZE\r\n211 End\r\n";
        let mut ctl = channel(data, true);
        assert_eq!(ctl.read_reply().await.unwrap(), 211);
        assert_eq!(
            ctl.reply().lines(),
            [
                "211-Features:",
                " MDTM",
                " 211 not the end",
                " SIZE",
                "211 End"
            ]
        );
    }

    #[tokio::test]
    async fn multi_line_strict_ignores_other_code() {
        let data = b"230-Welcome\r\n220 Other code\r\n230 Logged in\r\n";
        let mut ctl = channel(data, true);
        assert_eq!(ctl.read_reply().await.unwrap(), 230);
        assert_eq!(ctl.reply().lines().len(), 3);
    }

    #[tokio::test]
    async fn multi_line_lenient_other_code() {
        let data = b"230-Welcome\r\n   banner\r\n220 Other code\r\n";
        let mut ctl = channel(data, false);
        assert_eq!(ctl.read_reply().await.unwrap(), 230);
        assert_eq!(
            ctl.reply().lines(),
            ["230-Welcome", "   banner", "220 Other code"]
        );
    }

    #[tokio::test]
    async fn multi_line_lenient_continuation() {
        let data = b"211-Status\r\n211-still going\r\n211 End\r\n";
        let mut ctl = channel(data, false);
        assert_eq!(ctl.read_reply().await.unwrap(), 211);
        assert_eq!(ctl.reply().lines().len(), 3);
    }

    #[tokio::test]
    async fn closed_before_reply() {
        let mut ctl = channel(b"", false);
        let e = ctl.read_reply().await.unwrap_err();
        assert!(e.is_connection_closed());
    }

    #[tokio::test]
    async fn closed_inside_multi_line() {
        let mut ctl = channel(b"211-Status\r\n line\r\n", false);
        let e = ctl.read_reply().await.unwrap_err();
        assert!(e.is_connection_closed());
    }

    #[tokio::test]
    async fn truncated() {
        let mut ctl = channel(b"20\r\n", false);
        let e = ctl.read_reply().await.unwrap_err();
        assert!(matches!(e, FtpError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn not_digits() {
        let mut ctl = channel(b"2x0 hello\r\n", false);
        let e = ctl.read_reply().await.unwrap_err();
        assert!(matches!(e, FtpError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn service_not_available() {
        let mut ctl = channel(b"421 Timeout.\r\n", false);
        let listener = Arc::new(RecordListener::default());
        ctl.set_listener(listener.clone());
        let e = ctl.read_reply().await.unwrap_err();
        assert!(e.is_connection_closed());
        assert_eq!(ctl.reply().code(), 421);
        assert_eq!(ctl.reply().lines(), ["421 Timeout."]);
        assert_eq!(*listener.events.lock().unwrap(), ["< 421"]);
    }

    #[tokio::test]
    async fn quiet_read() {
        let mut ctl = channel(b"200 NOOP ok\r\n", false);
        let listener = Arc::new(RecordListener::default());
        ctl.set_listener(listener.clone());
        assert_eq!(ctl.read_reply_quiet().await.unwrap(), 200);
        assert!(listener.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_and_read() {
        let stream = Builder::new()
            .write(b"CWD /pub\r\n")
            .read(b"250 Okay.\r\n")
            .build();
        let mut ctl = FtpControlChannel::new(stream, FtpControlConfig::default());
        let listener = Arc::new(RecordListener::default());
        ctl.set_listener(listener.clone());
        assert_eq!(ctl.send_command("CWD", Some("/pub")).await.unwrap(), 250);
        assert_eq!(*listener.events.lock().unwrap(), ["> CWD", "< 250"]);
    }

    #[tokio::test]
    async fn line_too_long() {
        let stream = Builder::new().read(b"200 0123456789abcdef\r\n").build();
        let config = FtpControlConfig {
            max_line_len: 8,
            ..Default::default()
        };
        let mut ctl = FtpControlChannel::new(stream, config);
        let e = ctl.read_reply().await.unwrap_err();
        assert!(matches!(e, FtpError::MalformedReply(_)));
    }
}
