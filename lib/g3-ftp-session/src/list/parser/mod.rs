/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::{FtpFile, system_key};
use crate::config::FtpListingConfig;
use crate::error::{FtpError, FtpParserResolveError};
use crate::transfer::FtpLineReader;

mod composite;
pub use composite::CompositeEntryParser;

mod mlsx;
pub use mlsx::MlsxEntryParser;

mod nt;
pub use nt::NtEntryParser;

mod unix;
pub use unix::UnixEntryParser;

/// Turns raw listing entries into [`FtpFile`]s for one listing dialect.
#[async_trait]
pub trait FtpEntryParser: Send + Sync {
    /// `None` if the entry is not a file description in this dialect.
    fn parse_entry(&self, entry: &str) -> Option<FtpFile>;

    /// Read one raw entry, which is a single line for most dialects.
    async fn read_next_entry(&self, reader: &mut FtpLineReader) -> Result<Option<String>, FtpError> {
        reader.read_line().await
    }

    /// Clean up the whole raw listing before any entry is parsed.
    fn pre_parse(&self, _entries: &mut Vec<String>) {}
}

pub trait FtpEntryParserFactory: Send + Sync {
    fn create_by_key(&self, key: &str) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError>;

    /// Create by the system key of the config, which also configures the parser.
    fn create_by_config(
        &self,
        config: &FtpListingConfig,
    ) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError>;
}

type ParserBuilder = Arc<
    dyn Fn(Option<&FtpListingConfig>) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError>
        + Send
        + Sync,
>;

/// Parser lookup by system key.
///
/// Registered keys are matched exactly (ignoring case) before the builtin
/// aliases, which match any key containing them.
#[derive(Clone, Default)]
pub struct DefaultFtpEntryParserFactory {
    registry: HashMap<String, ParserBuilder>,
}

impl DefaultFtpEntryParserFactory {
    pub fn register<F>(&mut self, key: &str, builder: F)
    where
        F: Fn(Option<&FtpListingConfig>) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.registry
            .insert(key.to_ascii_uppercase(), Arc::new(builder));
    }

    fn create(
        &self,
        key: &str,
        config: Option<&FtpListingConfig>,
    ) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError> {
        if key.is_empty() {
            return Err(FtpParserResolveError::EmptyKey);
        }
        let ukey = key.to_ascii_uppercase();
        if let Some(builder) = self.registry.get(&ukey) {
            debug!("using registered ftp entry parser for {key}");
            return builder(config);
        }

        if ukey.contains(system_key::UNIX) {
            Ok(Arc::new(UnixEntryParser::new(config)?))
        } else if ukey.contains(system_key::VMS) {
            Err(FtpParserResolveError::UnsupportedDialect(system_key::VMS))
        } else if ukey.contains(system_key::WINDOWS) {
            match config {
                Some(c) if c.server_system_key() == system_key::WINDOWS => {
                    Ok(Arc::new(NtEntryParser::new(config)?))
                }
                _ => Ok(Arc::new(CompositeEntryParser::new(vec![
                    Arc::new(NtEntryParser::new(config)?),
                    Arc::new(UnixEntryParser::new(config)?),
                ]))),
            }
        } else if let Some(dialect) = [
            system_key::OS2,
            system_key::OS400,
            system_key::AS400,
            system_key::MVS,
            system_key::NETWARE,
            system_key::MACOS_PETER,
        ]
        .into_iter()
        .find(|dialect| ukey.contains(dialect))
        {
            Err(FtpParserResolveError::UnsupportedDialect(dialect))
        } else if ukey.contains(system_key::L8) {
            Ok(Arc::new(UnixEntryParser::new(config)?))
        } else {
            Err(FtpParserResolveError::UnknownKey(key.to_string()))
        }
    }
}

impl FtpEntryParserFactory for DefaultFtpEntryParserFactory {
    fn create_by_key(&self, key: &str) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError> {
        self.create(key, None)
    }

    fn create_by_config(
        &self,
        config: &FtpListingConfig,
    ) -> Result<Arc<dyn FtpEntryParser>, FtpParserResolveError> {
        self.create(config.server_system_key(), Some(config))
    }
}
