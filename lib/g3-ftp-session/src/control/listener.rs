/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// Observer of the command / reply exchange on the control channel.
///
/// Called inline by the client, implementations should return quickly.
pub trait FtpProtocolListener: Send + Sync {
    /// `message` is the full command line including the trailing CRLF.
    fn command_sent(&self, command: &str, message: &str);

    /// `message` is the full reply text, lines terminated by CRLF.
    ///
    /// A zero `code` is used for client side notices.
    fn reply_received(&self, code: u16, message: &str);
}

pub struct NoopProtocolListener;

impl FtpProtocolListener for NoopProtocolListener {
    fn command_sent(&self, _command: &str, _message: &str) {}

    fn reply_received(&self, _code: u16, _message: &str) {}
}
