/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// Progress of a file transfer driven by the client.
pub trait CopyStreamListener: Send {
    /// `total` bytes copied so far, `bytes` in the last chunk.
    fn bytes_transferred(&mut self, total: u64, bytes: usize, stream_size: Option<u64>);
}

impl<F> CopyStreamListener for F
where
    F: FnMut(u64, usize, Option<u64>) + Send,
{
    fn bytes_transferred(&mut self, total: u64, bytes: usize, stream_size: Option<u64>) {
        self(total, bytes, stream_size)
    }
}
