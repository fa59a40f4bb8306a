/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::io::AsyncBufRead;

pub(crate) trait LimitedBufReadExt: AsyncBufRead {
    /// Read until `delimiter` (included) but never more than `max_len` bytes.
    ///
    /// Returns `(found, len)`, where a zero `len` means EOF.
    fn limited_read_until<'a>(
        &'a mut self,
        delimiter: u8,
        max_len: usize,
        buf: &'a mut Vec<u8>,
    ) -> LimitedReadUntil<'a, Self>
    where
        Self: Unpin,
    {
        LimitedReadUntil {
            reader: self,
            delimiter,
            max_len,
            buf,
            read: 0,
        }
    }

    /// Wait until some data is buffered. Returns `Ok(false)` on EOF.
    ///
    /// This is cancel safe, the buffered data is kept in the reader.
    fn fill_wait_data(&mut self) -> FillWaitData<'_, Self>
    where
        Self: Unpin,
    {
        FillWaitData { reader: self }
    }
}

impl<R: AsyncBufRead + ?Sized> LimitedBufReadExt for R {}

pub(crate) struct LimitedReadUntil<'a, R: ?Sized> {
    reader: &'a mut R,
    delimiter: u8,
    max_len: usize,
    buf: &'a mut Vec<u8>,
    read: usize,
}

fn limited_read_until_internal<R: AsyncBufRead + ?Sized>(
    mut reader: Pin<&mut R>,
    cx: &mut Context<'_>,
    delimiter: u8,
    max_len: usize,
    buf: &mut Vec<u8>,
    read: &mut usize,
) -> Poll<io::Result<(bool, usize)>> {
    loop {
        let (found, limit_reached, used) = {
            let available = ready!(reader.as_mut().poll_fill_buf(cx))?;
            if available.is_empty() {
                return Poll::Ready(Ok((false, std::mem::replace(read, 0))));
            }

            let left = max_len.saturating_sub(*read);
            let to_check = available.len().min(left);
            if let Some(i) = memchr::memchr(delimiter, &available[..to_check]) {
                buf.extend_from_slice(&available[..=i]);
                (true, false, i + 1)
            } else {
                buf.extend_from_slice(&available[..to_check]);
                (false, to_check == left, to_check)
            }
        };
        reader.as_mut().consume(used);
        *read += used;
        if found || limit_reached {
            return Poll::Ready(Ok((found, std::mem::replace(read, 0))));
        }
    }
}

impl<R: AsyncBufRead + ?Sized + Unpin> Future for LimitedReadUntil<'_, R> {
    type Output = io::Result<(bool, usize)>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Self {
            reader,
            delimiter,
            max_len,
            buf,
            read,
        } = &mut *self;
        limited_read_until_internal(Pin::new(reader), cx, *delimiter, *max_len, buf, read)
    }
}

pub(crate) struct FillWaitData<'a, R: ?Sized> {
    reader: &'a mut R,
}

impl<R: AsyncBufRead + ?Sized + Unpin> Future for FillWaitData<'_, R> {
    type Output = io::Result<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Self { reader } = &mut *self;
        let buf = ready!(Pin::new(reader).poll_fill_buf(cx))?;
        Poll::Ready(Ok(!buf.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn read_until_found() {
        let data: &[u8] = b"abc\ndef\n";
        let mut reader = BufReader::new(data);
        let mut buf = Vec::new();
        let (found, len) = reader.limited_read_until(b'\n', 16, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(len, 4);
        assert_eq!(buf, b"abc\n");
    }

    #[tokio::test]
    async fn read_until_limited() {
        let data: &[u8] = b"abcdefgh\n";
        let mut reader = BufReader::new(data);
        let mut buf = Vec::new();
        let (found, len) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(len, 4);
        assert_eq!(buf, b"abcd");
    }

    #[tokio::test]
    async fn read_until_eof() {
        let data: &[u8] = b"ab";
        let mut reader = BufReader::new(data);
        let mut buf = Vec::new();
        let (found, len) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(len, 2);
        buf.clear();
        let (_, len) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert_eq!(len, 0);
    }

    #[tokio::test]
    async fn wait_data() {
        let data: &[u8] = b"x";
        let mut reader = BufReader::new(data);
        assert!(reader.fill_wait_data().await.unwrap());

        let data: &[u8] = b"";
        let mut reader = BufReader::new(data);
        assert!(!reader.fill_wait_data().await.unwrap());
    }
}
