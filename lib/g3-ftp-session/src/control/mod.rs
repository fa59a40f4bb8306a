/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

use crate::config::FtpControlConfig;
use crate::io::LimitedBufReadExt;

mod code;
pub mod reply_code {
    pub use super::code::*;
}

mod command;
pub use command::FtpCommand;

mod encoding;
pub use encoding::FtpControlEncoding;

mod listener;
pub use listener::{FtpProtocolListener, NoopProtocolListener};

mod reply;
pub use reply::FtpReply;

/// The control connection, one command and one reply at a time.
pub(crate) struct FtpControlChannel<T> {
    config: FtpControlConfig,
    stream: BufStream<T>,
    encoding: FtpControlEncoding,
    listener: Arc<dyn FtpProtocolListener>,
    reply: FtpReply,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: T, config: FtpControlConfig) -> Self {
        let encoding = config.encoding;
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
            encoding,
            listener: Arc::new(NoopProtocolListener),
            reply: FtpReply::default(),
        }
    }

    pub(crate) fn set_listener(&mut self, listener: Arc<dyn FtpProtocolListener>) {
        self.listener = listener;
    }

    pub(crate) fn set_encoding(&mut self, encoding: FtpControlEncoding) {
        self.encoding = encoding;
    }

    #[inline]
    pub(crate) fn encoding(&self) -> FtpControlEncoding {
        self.encoding
    }

    /// The last reply received.
    #[inline]
    pub(crate) fn reply(&self) -> &FtpReply {
        &self.reply
    }

    pub(crate) fn set_reply(&mut self, reply: FtpReply) {
        self.reply = reply;
    }

    /// Wait until reply data is available, `Ok(false)` means the peer closed.
    ///
    /// This is cancel safe.
    pub(crate) async fn wait_read_ready(&mut self) -> io::Result<bool> {
        self.stream.fill_wait_data().await
    }

    pub(crate) async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
