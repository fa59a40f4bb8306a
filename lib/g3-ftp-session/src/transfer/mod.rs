/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod netascii;
pub use netascii::{NetAsciiReader, NetAsciiWriter};

mod stream;
pub use stream::{FtpDataReader, FtpDataWriter};

mod listener;
pub use listener::CopyStreamListener;

mod line;
pub use line::FtpLineReader;

mod copy;
pub(crate) use copy::with_data_timeout;

mod client;
