/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::copy::{ControlKeepAlive, copy_stream};
use super::{FtpDataReader, FtpDataWriter, with_data_timeout};
use crate::FtpClient;
use crate::connection::FtpConnectionProvider;
use crate::control::FtpCommand;
use crate::error::FtpError;

impl<P: FtpConnectionProvider> FtpClient<P> {
    fn new_keepalive(&self) -> Option<ControlKeepAlive> {
        let config = &self.config.transfer;
        config
            .control_keepalive_timeout
            .filter(|idle| !idle.is_zero())
            .map(|idle| ControlKeepAlive::new(idle, config.control_keepalive_reply_timeout))
    }

    async fn copy_data<R, W>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        keepalive: Option<&mut ControlKeepAlive>,
    ) -> Result<u64, FtpError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let control = self.control.as_mut().ok_or(FtpError::NotConnected)?;
        copy_stream(
            reader,
            writer,
            &self.config.transfer,
            &mut self.copy_listener,
            keepalive,
            control,
        )
        .await
    }

    /// Drain the keep-alive replies and read the final transfer reply.
    ///
    /// A copy error is returned before any error from the drain.
    async fn finish_transfer(
        &mut self,
        copied: Result<u64, FtpError>,
        keepalive: Option<ControlKeepAlive>,
    ) -> Result<bool, FtpError> {
        let drained = match keepalive {
            Some(ka) => match self.control.as_mut() {
                Some(control) => ka.drain(control).await,
                None => Err(FtpError::NotConnected),
            },
            None => Ok(()),
        };
        let total = copied?;
        drained?;
        debug!("ftp data transfer done, {total} bytes copied");
        self.complete_pending_command().await
    }

    /// Download `remote` into `local`, `false` if the transfer is not accepted or failed.
    pub async fn retrieve_file<W>(&mut self, remote: &str, local: &mut W) -> Result<bool, FtpError>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(stream) = self
            .open_data_connection(FtpCommand::RETR.as_str(), Some(remote))
            .await?
        else {
            return Ok(false);
        };
        let mut reader = FtpDataReader::new(
            stream,
            self.state.file_type.is_ascii(),
            self.config.transfer.buffer_size,
        );

        let mut keepalive = self.new_keepalive();
        let copied = self.copy_data(&mut reader, local, keepalive.as_mut()).await;
        drop(reader);
        self.finish_transfer(copied, keepalive).await
    }

    async fn store<R>(
        &mut self,
        cmd: FtpCommand,
        remote: Option<&str>,
        local: &mut R,
    ) -> Result<bool, FtpError>
    where
        R: AsyncRead + Unpin,
    {
        let Some(stream) = self.open_data_connection(cmd.as_str(), remote).await? else {
            return Ok(false);
        };
        let mut writer = FtpDataWriter::new(stream, self.state.file_type.is_ascii());

        let mut keepalive = self.new_keepalive();
        let mut copied = self.copy_data(local, &mut writer, keepalive.as_mut()).await;
        if let Ok(n) = copied {
            // the server takes the close of the data connection as the end of file
            copied = with_data_timeout(
                self.config.transfer.data_timeout,
                "data shutdown",
                writer.shutdown(),
            )
            .await
            .map(|_| n);
        }
        drop(writer);
        self.finish_transfer(copied, keepalive).await
    }

    pub async fn store_file<R>(&mut self, remote: &str, local: &mut R) -> Result<bool, FtpError>
    where
        R: AsyncRead + Unpin,
    {
        self.store(FtpCommand::STOR, Some(remote), local).await
    }

    pub async fn append_file<R>(&mut self, remote: &str, local: &mut R) -> Result<bool, FtpError>
    where
        R: AsyncRead + Unpin,
    {
        self.store(FtpCommand::APPE, Some(remote), local).await
    }

    /// STOU, the server chooses the final name, which may be based on `remote`.
    pub async fn store_unique_file<R>(
        &mut self,
        remote: Option<&str>,
        local: &mut R,
    ) -> Result<bool, FtpError>
    where
        R: AsyncRead + Unpin,
    {
        self.store(FtpCommand::STOU, remote, local).await
    }

    /// Open a download stream.
    ///
    /// Read it to the end, drop it, then call [`FtpClient::complete_pending_command`].
    pub async fn retrieve_file_stream(
        &mut self,
        remote: &str,
    ) -> Result<Option<FtpDataReader<P::Stream>>, FtpError> {
        let stream = self
            .open_data_connection(FtpCommand::RETR.as_str(), Some(remote))
            .await?;
        Ok(stream.map(|s| {
            FtpDataReader::new(
                s,
                self.state.file_type.is_ascii(),
                self.config.transfer.buffer_size,
            )
        }))
    }

    async fn store_stream(
        &mut self,
        cmd: FtpCommand,
        remote: Option<&str>,
    ) -> Result<Option<FtpDataWriter<P::Stream>>, FtpError> {
        let stream = self.open_data_connection(cmd.as_str(), remote).await?;
        Ok(stream.map(|s| FtpDataWriter::new(s, self.state.file_type.is_ascii())))
    }

    /// Open an upload stream.
    ///
    /// Shut it down when done, then call [`FtpClient::complete_pending_command`].
    pub async fn store_file_stream(
        &mut self,
        remote: &str,
    ) -> Result<Option<FtpDataWriter<P::Stream>>, FtpError> {
        self.store_stream(FtpCommand::STOR, Some(remote)).await
    }

    pub async fn append_file_stream(
        &mut self,
        remote: &str,
    ) -> Result<Option<FtpDataWriter<P::Stream>>, FtpError> {
        self.store_stream(FtpCommand::APPE, Some(remote)).await
    }

    pub async fn store_unique_file_stream(
        &mut self,
        remote: Option<&str>,
    ) -> Result<Option<FtpDataWriter<P::Stream>>, FtpError> {
        self.store_stream(FtpCommand::STOU, remote).await
    }
}
