/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod engine;
pub use engine::FtpListParseEngine;

mod file;
pub use file::{FtpAccess, FtpFile, FtpFileKind, FtpPermission};

pub mod filter;
pub use filter::FtpFileFilter;

mod parser;
pub use parser::{
    CompositeEntryParser, DefaultFtpEntryParserFactory, FtpEntryParser, FtpEntryParserFactory,
    MlsxEntryParser, NtEntryParser, UnixEntryParser,
};

pub mod system_key;

mod timestamp;
pub use timestamp::FtpTimestampParser;
