/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::FtpClientConfig;
use crate::list::FtpEntryParser;

/// Format of text files, the second TYPE parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpTextFormat {
    #[default]
    NonPrint,
    Telnet,
    CarriageControl,
}

impl FtpTextFormat {
    fn code(&self) -> char {
        match self {
            FtpTextFormat::NonPrint => 'N',
            FtpTextFormat::Telnet => 'T',
            FtpTextFormat::CarriageControl => 'C',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FtpFileType {
    Ascii(FtpTextFormat),
    Ebcdic(FtpTextFormat),
    Binary,
    /// local type with the logical byte size
    Local(u8),
}

impl Default for FtpFileType {
    fn default() -> Self {
        FtpFileType::Ascii(FtpTextFormat::NonPrint)
    }
}

impl FtpFileType {
    /// The argument of the TYPE command.
    ///
    /// The default non-print format is not sent explicitly.
    pub(crate) fn command_arg(&self) -> String {
        match self {
            FtpFileType::Ascii(FtpTextFormat::NonPrint) => "A".to_string(),
            FtpFileType::Ascii(f) => format!("A {}", f.code()),
            FtpFileType::Ebcdic(FtpTextFormat::NonPrint) => "E".to_string(),
            FtpFileType::Ebcdic(f) => format!("E {}", f.code()),
            FtpFileType::Binary => "I".to_string(),
            FtpFileType::Local(size) => format!("L {size}"),
        }
    }

    /// Whether data should be translated with NETASCII.
    #[inline]
    pub fn is_ascii(&self) -> bool {
        matches!(self, FtpFileType::Ascii(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpFileStructure {
    #[default]
    File,
    Record,
    Page,
}

impl FtpFileStructure {
    pub(crate) fn command_arg(&self) -> &'static str {
        match self {
            FtpFileStructure::File => "F",
            FtpFileStructure::Record => "R",
            FtpFileStructure::Page => "P",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpTransferMode {
    #[default]
    Stream,
    Block,
    Compressed,
}

impl FtpTransferMode {
    pub(crate) fn command_arg(&self) -> &'static str {
        match self {
            FtpTransferMode::Stream => "S",
            FtpTransferMode::Block => "B",
            FtpTransferMode::Compressed => "C",
        }
    }
}

/// Who opens the data connection, and whether this client takes part in it.
///
/// Only the local modes open sockets here, the remote modes are used to
/// set up server to server transfers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataConnectionMode {
    #[default]
    ActiveLocal,
    ActiveRemote,
    PassiveLocal,
    PassiveRemote,
}

/// Per session state, reset as a whole on connect, disconnect and REIN.
pub struct SessionState {
    pub(crate) file_type: FtpFileType,
    pub(crate) file_structure: FtpFileStructure,
    pub(crate) transfer_mode: FtpTransferMode,
    pub(crate) data_mode: DataConnectionMode,
    /// the address from the last PASV / EPSV, or the one given for active remote mode
    pub(crate) passive_addr: Option<SocketAddr>,
    pub(crate) restart_offset: u64,
    pub(crate) remote_verification: bool,
    pub(crate) features: Option<HashMap<String, Vec<String>>>,
    /// an empty feature map is left by a failed FEAT as well
    pub(crate) features_ok: bool,
    pub(crate) system_type: Option<String>,
    pub(crate) entry_parser: Option<(String, Arc<dyn FtpEntryParser>)>,
}

impl SessionState {
    pub(crate) fn new(config: &FtpClientConfig) -> Self {
        SessionState {
            file_type: FtpFileType::default(),
            file_structure: FtpFileStructure::default(),
            transfer_mode: FtpTransferMode::default(),
            data_mode: DataConnectionMode::default(),
            passive_addr: None,
            restart_offset: 0,
            remote_verification: config.remote_verification,
            features: None,
            features_ok: false,
            system_type: None,
            entry_parser: None,
        }
    }

    /// Drop everything learned from the server.
    ///
    /// Remote verification is a user choice and survives the reset.
    pub(crate) fn reset(&mut self) {
        self.file_type = FtpFileType::default();
        self.file_structure = FtpFileStructure::default();
        self.transfer_mode = FtpTransferMode::default();
        self.data_mode = DataConnectionMode::default();
        self.passive_addr = None;
        self.restart_offset = 0;
        self.features = None;
        self.features_ok = false;
        self.system_type = None;
        self.entry_parser = None;
    }

    #[inline]
    pub fn file_type(&self) -> FtpFileType {
        self.file_type
    }

    #[inline]
    pub fn file_structure(&self) -> FtpFileStructure {
        self.file_structure
    }

    #[inline]
    pub fn transfer_mode(&self) -> FtpTransferMode {
        self.transfer_mode
    }

    #[inline]
    pub fn data_connection_mode(&self) -> DataConnectionMode {
        self.data_mode
    }

    #[inline]
    pub fn passive_addr(&self) -> Option<SocketAddr> {
        self.passive_addr
    }

    #[inline]
    pub fn restart_offset(&self) -> u64 {
        self.restart_offset
    }

    #[inline]
    pub fn remote_verification(&self) -> bool {
        self.remote_verification
    }

    #[inline]
    pub fn system_type(&self) -> Option<&str> {
        self.system_type.as_deref()
    }

    pub fn entry_parser_key(&self) -> Option<&str> {
        self.entry_parser.as_ref().map(|(k, _)| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_arg() {
        assert_eq!(FtpFileType::default().command_arg(), "A");
        assert_eq!(
            FtpFileType::Ascii(FtpTextFormat::Telnet).command_arg(),
            "A T"
        );
        assert_eq!(
            FtpFileType::Ebcdic(FtpTextFormat::CarriageControl).command_arg(),
            "E C"
        );
        assert_eq!(FtpFileType::Binary.command_arg(), "I");
        assert_eq!(FtpFileType::Local(8).command_arg(), "L 8");
    }

    #[test]
    fn reset_keeps_verification() {
        let config = FtpClientConfig {
            remote_verification: false,
            ..Default::default()
        };
        let mut state = SessionState::new(&config);
        state.file_type = FtpFileType::Binary;
        state.restart_offset = 100;
        state.system_type = Some("UNIX".to_string());
        state.features = Some(HashMap::new());
        state.data_mode = DataConnectionMode::PassiveLocal;

        state.reset();
        assert_eq!(state.file_type(), FtpFileType::default());
        assert_eq!(state.restart_offset(), 0);
        assert!(state.system_type().is_none());
        assert!(state.features.is_none());
        assert_eq!(state.data_connection_mode(), DataConnectionMode::ActiveLocal);
        assert!(!state.remote_verification());
    }
}
