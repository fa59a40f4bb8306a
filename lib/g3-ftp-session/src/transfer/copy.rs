/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::future::Future;
use std::io;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use super::CopyStreamListener;
use crate::config::FtpTransferConfig;
use crate::control::FtpControlChannel;
use crate::error::FtpError;

pub(crate) async fn with_data_timeout<F, T>(
    timeout: Option<Duration>,
    stage: &'static str,
    f: F,
) -> Result<T, FtpError>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout {
        Some(t) => match tokio::time::timeout(t, f).await {
            Ok(r) => r.map_err(FtpError::Io),
            Err(_) => Err(FtpError::TimedOut(stage)),
        },
        None => f.await.map_err(FtpError::Io),
    }
}

/// Send NOOP on the control connection when the data transfer has been
/// going on for too long without one.
pub(crate) struct ControlKeepAlive {
    idle: Duration,
    reply_timeout: Duration,
    last: Instant,
    not_acked: usize,
}

impl ControlKeepAlive {
    pub(crate) fn new(idle: Duration, reply_timeout: Duration) -> Self {
        ControlKeepAlive {
            idle,
            reply_timeout,
            last: Instant::now(),
            not_acked: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn not_acked(&self) -> usize {
        self.not_acked
    }

    async fn ping<T>(&mut self, control: &mut FtpControlChannel<T>) -> Result<(), FtpError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        control.send_quiet_noop().await?;
        self.last = Instant::now();

        match tokio::time::timeout(self.reply_timeout, control.wait_read_ready()).await {
            Ok(Ok(true)) => match control.read_reply_quiet().await {
                Ok(_) => Ok(()),
                Err(e @ (FtpError::ConnectionClosed(_) | FtpError::MalformedReply(_))) => Err(e),
                Err(e) => {
                    warn!("failed to read keep-alive NOOP reply: {e}");
                    Ok(())
                }
            },
            Ok(Ok(false)) => Err(FtpError::ConnectionClosed(
                "control connection closed during data transfer".to_string(),
            )),
            Ok(Err(e)) => {
                warn!("failed to wait keep-alive NOOP reply: {e}");
                Ok(())
            }
            Err(_) => {
                self.not_acked += 1;
                debug!("keep-alive NOOP not acked in time, {} pending", self.not_acked);
                Ok(())
            }
        }
    }

    pub(crate) async fn check<T>(&mut self, control: &mut FtpControlChannel<T>) -> Result<(), FtpError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        if self.last.elapsed() > self.idle {
            self.ping(control).await
        } else {
            Ok(())
        }
    }

    /// Read the replies of all NOOPs not acked during the transfer.
    pub(crate) async fn drain<T>(self, control: &mut FtpControlChannel<T>) -> Result<(), FtpError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        for _ in 0..self.not_acked {
            control.read_reply_quiet().await?;
        }
        Ok(())
    }
}

/// Copy all data from `reader` to `writer`, the writer is flushed but not shut down.
pub(crate) async fn copy_stream<R, W, T>(
    reader: &mut R,
    writer: &mut W,
    config: &FtpTransferConfig,
    listener: &mut Option<Box<dyn CopyStreamListener>>,
    mut keepalive: Option<&mut ControlKeepAlive>,
    control: &mut FtpControlChannel<T>,
) -> Result<u64, FtpError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; config.buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = with_data_timeout(config.data_timeout, "data read", reader.read(&mut buf)).await?;
        if n == 0 {
            break;
        }
        with_data_timeout(
            config.data_timeout,
            "data write",
            writer.write_all(&buf[..n]),
        )
        .await?;
        total += n as u64;

        if let Some(l) = listener {
            l.bytes_transferred(total, n, None);
        }
        if let Some(ka) = keepalive.as_deref_mut() {
            ka.check(control).await?;
        }
    }

    with_data_timeout(config.data_timeout, "data flush", writer.flush()).await?;
    Ok(total)
}
