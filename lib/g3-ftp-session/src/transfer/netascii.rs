/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use pin_project_lite::pin_project;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, ReadBuf};

pin_project! {
    /// Translate NETASCII `CRLF` line endings to `LF` on read.
    ///
    /// A `CR` not followed by `LF` is kept.
    pub struct NetAsciiReader<R> {
        #[pin]
        inner: R,
        pending_cr: bool,
    }
}

impl<R> NetAsciiReader<R> {
    pub fn new(inner: R) -> Self {
        NetAsciiReader {
            inner,
            pending_cr: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncBufRead> AsyncRead for NetAsciiReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let mut this = self.project();
        loop {
            if *this.pending_cr {
                let available = ready!(this.inner.as_mut().poll_fill_buf(cx))?;
                *this.pending_cr = false;
                if available.first() == Some(&b'\n') {
                    buf.put_slice(b"\n");
                    this.inner.as_mut().consume(1);
                } else {
                    buf.put_slice(b"\r");
                }
                return Poll::Ready(Ok(()));
            }

            let available = ready!(this.inner.as_mut().poll_fill_buf(cx))?;
            if available.is_empty() {
                return Poll::Ready(Ok(()));
            }

            let filled = buf.filled().len();
            let mut i = 0;
            while i < available.len() && buf.remaining() > 0 {
                let c = available[i];
                if c != b'\r' {
                    buf.put_slice(&available[i..i + 1]);
                    i += 1;
                    continue;
                }
                match available.get(i + 1) {
                    Some(b'\n') => {
                        buf.put_slice(b"\n");
                        i += 2;
                    }
                    Some(_) => {
                        buf.put_slice(b"\r");
                        i += 1;
                    }
                    None => {
                        // decided by the next fill
                        *this.pending_cr = true;
                        i += 1;
                    }
                }
            }
            this.inner.as_mut().consume(i);
            if buf.filled().len() > filled {
                return Poll::Ready(Ok(()));
            }
        }
    }
}

pin_project! {
    /// Translate line endings to NETASCII `CRLF` on write.
    ///
    /// A `LF` already preceded by `CR` is written as is.
    pub struct NetAsciiWriter<W> {
        #[pin]
        inner: W,
        last_cr: bool,
        pending: Vec<u8>,
        pos: usize,
    }
}

impl<W> NetAsciiWriter<W> {
    pub fn new(inner: W) -> Self {
        NetAsciiWriter {
            inner,
            last_cr: false,
            pending: Vec::new(),
            pos: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite> NetAsciiWriter<W> {
    fn poll_write_pending(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut this = self.project();
        while *this.pos < this.pending.len() {
            let n = ready!(this.inner.as_mut().poll_write(cx, &this.pending[*this.pos..]))?;
            if n == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "write zero byte into the data connection",
                )));
            }
            *this.pos += n;
        }
        this.pending.clear();
        *this.pos = 0;
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite> AsyncWrite for NetAsciiWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        ready!(self.as_mut().poll_write_pending(cx))?;
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let this = self.project();
        this.pending.reserve(buf.len() + buf.len() / 16);
        for &c in buf {
            match c {
                b'\r' => {
                    *this.last_cr = true;
                }
                b'\n' => {
                    if !*this.last_cr {
                        this.pending.push(b'\r');
                    }
                    *this.last_cr = false;
                }
                _ => {
                    *this.last_cr = false;
                }
            }
            this.pending.push(c);
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.as_mut().poll_write_pending(cx))?;
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        ready!(self.as_mut().poll_write_pending(cx))?;
        self.project().inner.poll_shutdown(cx)
    }
}
