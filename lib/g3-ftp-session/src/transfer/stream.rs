/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, BufReader, ReadBuf};

use super::{NetAsciiReader, NetAsciiWriter};

/// The read side of a data connection, NETASCII translated for ASCII transfers.
pub enum FtpDataReader<S> {
    Binary(S),
    Ascii(NetAsciiReader<BufReader<S>>),
}

impl<S: AsyncRead> FtpDataReader<S> {
    pub(crate) fn new(stream: S, ascii: bool, buffer_size: usize) -> Self {
        if ascii {
            FtpDataReader::Ascii(NetAsciiReader::new(BufReader::with_capacity(
                buffer_size,
                stream,
            )))
        } else {
            FtpDataReader::Binary(stream)
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for FtpDataReader<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FtpDataReader::Binary(s) => Pin::new(s).poll_read(cx, buf),
            FtpDataReader::Ascii(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

/// The write side of a data connection, NETASCII translated for ASCII transfers.
///
/// Shut it down to finish the upload, then complete the pending command.
pub enum FtpDataWriter<S> {
    Binary(S),
    Ascii(NetAsciiWriter<S>),
}

impl<S: AsyncWrite> FtpDataWriter<S> {
    pub(crate) fn new(stream: S, ascii: bool) -> Self {
        if ascii {
            FtpDataWriter::Ascii(NetAsciiWriter::new(stream))
        } else {
            FtpDataWriter::Binary(stream)
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for FtpDataWriter<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            FtpDataWriter::Binary(s) => Pin::new(s).poll_write(cx, buf),
            FtpDataWriter::Ascii(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FtpDataWriter::Binary(s) => Pin::new(s).poll_flush(cx),
            FtpDataWriter::Ascii(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            FtpDataWriter::Binary(s) => Pin::new(s).poll_shutdown(cx),
            FtpDataWriter::Ascii(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}
