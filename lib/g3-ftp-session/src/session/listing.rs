/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::sync::Arc;

use log::debug;

use super::FtpClient;
use crate::connection::FtpConnectionProvider;
use crate::control::{FtpCommand, reply_code};
use crate::error::FtpError;
use crate::list::{
    FtpEntryParser, FtpFile, FtpFileFilter, FtpListParseEngine, MlsxEntryParser, filter,
};
use crate::transfer::FtpLineReader;

impl<P: FtpConnectionProvider> FtpClient<P> {
    fn list_arguments(&self, path: Option<&str>) -> Option<String> {
        if self.config.list_hidden_files {
            match path {
                Some(path) => Some(format!("-a {path}")),
                None => Some("-a".to_string()),
            }
        } else {
            path.map(|s| s.to_string())
        }
    }

    fn new_line_reader(&self, stream: P::Stream) -> FtpLineReader {
        FtpLineReader::new(stream, self.control_encoding(), &self.config.transfer)
    }

    /// NLST, `None` if the listing is rejected.
    pub async fn list_names(&mut self, path: Option<&str>) -> Result<Option<Vec<String>>, FtpError> {
        let arg = self.list_arguments(path);
        let Some(stream) = self
            .open_data_connection(FtpCommand::NLST.as_str(), arg.as_deref())
            .await?
        else {
            return Ok(None);
        };

        let mut reader = self.new_line_reader(stream);
        let max_entries = self.config.transfer.list_max_entries;
        let mut names = Vec::new();
        while let Some(line) = reader.read_line().await? {
            if max_entries > 0 && names.len() >= max_entries {
                return Err(FtpError::TooManyListEntries(max_entries));
            }
            names.push(line);
        }
        drop(reader);

        if self.complete_pending_command().await? {
            Ok(Some(names))
        } else {
            Ok(None)
        }
    }

    /// Pick the entry parser, in order: the given key, the listing config,
    /// the configured system type, then the SYST reply remapped by the overrides.
    async fn resolve_entry_parser(
        &mut self,
        key: Option<&str>,
    ) -> Result<Arc<dyn FtpEntryParser>, FtpError> {
        let config_key = self
            .listing_config
            .as_ref()
            .map(|c| c.server_system_key())
            .filter(|k| !k.is_empty())
            .map(|k| k.to_string());
        let (key, by_config) = if let Some(key) = key {
            (key.to_string(), false)
        } else if let Some(key) = config_key {
            (key, true)
        } else if let Some(system) = self.config.system_type.clone() {
            (system, false)
        } else {
            let system = self.get_system_type().await?;
            let key = self
                .system_type_overrides
                .get(&system)
                .map(|s| s.to_string())
                .unwrap_or(system);
            (key, false)
        };

        if let Some((cached_key, parser)) = &self.state.entry_parser
            && *cached_key == key
        {
            return Ok(parser.clone());
        }

        let parser = match (&self.listing_config, by_config) {
            (Some(config), true) => self.parser_factory.create_by_config(config)?,
            _ => self.parser_factory.create_by_key(&key)?,
        };
        debug!("ftp entry parser created for system key {key}");
        self.state.entry_parser = Some((key, parser.clone()));
        Ok(parser)
    }

    async fn read_listing(
        &mut self,
        parser: Arc<dyn FtpEntryParser>,
        cmd: FtpCommand,
        arg: Option<&str>,
    ) -> Result<FtpListParseEngine, FtpError> {
        let mut engine = FtpListParseEngine::new(parser);
        let Some(stream) = self.open_data_connection(cmd.as_str(), arg).await? else {
            return Ok(engine);
        };

        let mut reader = self.new_line_reader(stream);
        engine
            .read_entries(&mut reader, self.config.transfer.list_max_entries)
            .await?;
        drop(reader);

        // the entries are already there, whatever the final reply is
        self.complete_pending_command().await?;
        Ok(engine)
    }

    /// LIST with lazy parsing.
    ///
    /// The engine is empty if the data connection is rejected.
    pub async fn initiate_list_parsing(
        &mut self,
        parser_key: Option<&str>,
        path: Option<&str>,
    ) -> Result<FtpListParseEngine, FtpError> {
        let parser = self.resolve_entry_parser(parser_key).await?;
        let arg = self.list_arguments(path);
        self.read_listing(parser, FtpCommand::LIST, arg.as_deref())
            .await
    }

    /// MLSD with lazy parsing, there is no parser resolution.
    pub async fn initiate_mlist_parsing(
        &mut self,
        path: Option<&str>,
    ) -> Result<FtpListParseEngine, FtpError> {
        self.read_listing(Arc::new(MlsxEntryParser), FtpCommand::MLSD, path)
            .await
    }

    pub async fn list_files(&mut self, path: Option<&str>) -> Result<Vec<FtpFile>, FtpError> {
        let engine = self.initiate_list_parsing(None, path).await?;
        Ok(engine.get_files())
    }

    pub async fn list_files_filtered<F>(
        &mut self,
        path: Option<&str>,
        filter: &F,
    ) -> Result<Vec<Option<FtpFile>>, FtpError>
    where
        F: FtpFileFilter + ?Sized,
    {
        let engine = self.initiate_list_parsing(None, path).await?;
        Ok(engine.get_files_with(filter))
    }

    pub async fn list_directories(&mut self, path: Option<&str>) -> Result<Vec<FtpFile>, FtpError> {
        let dirs = self.list_files_filtered(path, &filter::Directories).await?;
        Ok(dirs.into_iter().flatten().collect())
    }

    pub async fn mlist_dir(&mut self, path: Option<&str>) -> Result<Vec<FtpFile>, FtpError> {
        let engine = self.initiate_mlist_parsing(path).await?;
        Ok(engine.get_files())
    }

    pub async fn mlist_dir_filtered<F>(
        &mut self,
        path: Option<&str>,
        filter: &F,
    ) -> Result<Vec<Option<FtpFile>>, FtpError>
    where
        F: FtpFileFilter + ?Sized,
    {
        let engine = self.initiate_mlist_parsing(path).await?;
        Ok(engine.get_files_with(filter))
    }

    /// MLST, the facts come in the second line of the reply.
    pub async fn mlist_file(&mut self, path: Option<&str>) -> Result<Option<FtpFile>, FtpError> {
        let code = self.send_command(FtpCommand::MLST.as_str(), path).await?;
        if !reply_code::is_positive_completion(code) {
            return Ok(None);
        }

        let lines = self.reply_lines();
        let entry = lines
            .get(1)
            .and_then(|line| line.get(1..))
            .ok_or_else(|| {
                FtpError::MalformedReply(format!("no facts line in MLST reply: {}", lines.join(" ")))
            })?;
        Ok(MlsxEntryParser.parse_entry(entry))
    }
}
