/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};

mod io;
mod time_val;

mod config;
pub use config::{
    FtpClientConfig, FtpControlConfig, FtpListingConfig, FtpTransferConfig, SystemTypeOverrides,
};

mod error;
pub use error::{FtpConfigError, FtpError, FtpParserResolveError, FtpRawResponseError};

mod connection;
pub use connection::{
    FtpConnectedStream, FtpConnectionProvider, FtpDataListener, TcpConnectionProvider,
    TcpDataListener,
};

mod control;
pub use control::{
    FtpCommand, FtpControlEncoding, FtpProtocolListener, FtpReply, NoopProtocolListener,
    reply_code,
};

mod data;

mod transfer;
pub use transfer::{
    CopyStreamListener, FtpDataReader, FtpDataWriter, FtpLineReader, NetAsciiReader,
    NetAsciiWriter,
};

mod list;
pub use list::{
    CompositeEntryParser, DefaultFtpEntryParserFactory, FtpAccess, FtpEntryParser,
    FtpEntryParserFactory, FtpFile, FtpFileFilter, FtpFileKind, FtpListParseEngine, FtpPermission,
    FtpTimestampParser, MlsxEntryParser, NtEntryParser, UnixEntryParser, filter, system_key,
};

mod session;
pub use session::{
    DataConnectionMode, FtpClient, FtpFileStructure, FtpFileType, FtpTextFormat, FtpTransferMode,
    SessionState,
};
