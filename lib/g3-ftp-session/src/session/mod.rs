/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::SocketAddr;
use std::sync::Arc;

use log::debug;

use crate::config::{FtpClientConfig, FtpListingConfig, SystemTypeOverrides};
use crate::connection::{FtpConnectionProvider, TcpConnectionProvider};
use crate::control::{
    FtpControlChannel, FtpControlEncoding, FtpProtocolListener, FtpReply, NoopProtocolListener,
    reply_code,
};
use crate::error::FtpError;
use crate::list::{DefaultFtpEntryParserFactory, FtpEntryParserFactory};
use crate::transfer::CopyStreamListener;

mod state;
pub use state::{
    DataConnectionMode, FtpFileStructure, FtpFileType, FtpTextFormat, FtpTransferMode,
    SessionState,
};

mod command;
mod feature;
mod listing;
mod ops;

/// An FTP client session.
///
/// Protocol level rejections are reported as `false` or `None`, the last
/// reply can then be inspected with [`FtpClient::reply_code`] and friends.
/// Only transport failures are returned as [`FtpError`].
pub struct FtpClient<P: FtpConnectionProvider = TcpConnectionProvider> {
    pub(crate) config: FtpClientConfig,
    pub(crate) provider: P,
    pub(crate) control: Option<FtpControlChannel<P::Stream>>,
    pub(crate) local_addr: Option<SocketAddr>,
    pub(crate) remote_addr: Option<SocketAddr>,
    pub(crate) state: SessionState,
    listener: Arc<dyn FtpProtocolListener>,
    pub(crate) copy_listener: Option<Box<dyn CopyStreamListener>>,
    pub(crate) listing_config: Option<FtpListingConfig>,
    pub(crate) parser_factory: Arc<dyn FtpEntryParserFactory>,
    pub(crate) system_type_overrides: SystemTypeOverrides,
}

impl FtpClient<TcpConnectionProvider> {
    pub fn new(config: FtpClientConfig) -> Self {
        FtpClient::with_provider(config, TcpConnectionProvider::default())
    }
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    pub fn with_provider(config: FtpClientConfig, provider: P) -> Self {
        let state = SessionState::new(&config);
        FtpClient {
            config,
            provider,
            control: None,
            local_addr: None,
            remote_addr: None,
            state,
            listener: Arc::new(NoopProtocolListener),
            copy_listener: None,
            listing_config: None,
            parser_factory: Arc::new(DefaultFtpEntryParserFactory::default()),
            system_type_overrides: SystemTypeOverrides::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &FtpClientConfig {
        &self.config
    }

    /// Changes take effect on the next operation that reads them.
    #[inline]
    pub fn config_mut(&mut self) -> &mut FtpClientConfig {
        &mut self.config
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_protocol_listener(&mut self, listener: Arc<dyn FtpProtocolListener>) {
        if let Some(control) = &mut self.control {
            control.set_listener(listener.clone());
        }
        self.listener = listener;
    }

    /// Set the session wide copy progress listener.
    pub fn set_copy_stream_listener(&mut self, listener: Option<Box<dyn CopyStreamListener>>) {
        self.copy_listener = listener;
    }

    /// Parser configuration used by [`FtpClient::initiate_list_parsing`] when no key is given.
    pub fn set_listing_config(&mut self, config: Option<FtpListingConfig>) {
        self.listing_config = config;
        self.state.entry_parser = None;
    }

    pub fn set_parser_factory(&mut self, factory: Arc<dyn FtpEntryParserFactory>) {
        self.parser_factory = factory;
        self.state.entry_parser = None;
    }

    pub fn set_system_type_overrides(&mut self, overrides: SystemTypeOverrides) {
        self.system_type_overrides = overrides;
    }

    pub fn set_remote_verification(&mut self, enable: bool) {
        self.state.remote_verification = enable;
    }

    /// Set the offset for the next RETR / STOR, consumed by the next REST.
    pub fn set_restart_offset(&mut self, offset: u64) {
        self.state.restart_offset = offset;
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.control.is_some()
    }

    #[inline]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    #[inline]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub(crate) fn control_mut(&mut self) -> Result<&mut FtpControlChannel<P::Stream>, FtpError> {
        self.control.as_mut().ok_or(FtpError::NotConnected)
    }

    pub(crate) fn control_addrs(&self) -> Result<(SocketAddr, SocketAddr), FtpError> {
        match (self.local_addr, self.remote_addr) {
            (Some(local), Some(remote)) => Ok((local, remote)),
            _ => Err(FtpError::NotConnected),
        }
    }

    pub(crate) fn fire_notice(&self, message: &str) {
        self.listener.reply_received(0, message);
    }

    /// The last reply, if connected.
    pub fn reply(&self) -> Option<&FtpReply> {
        self.control.as_ref().map(|c| c.reply())
    }

    /// 0 if there is no reply yet.
    pub fn reply_code(&self) -> u16 {
        self.reply().map(|r| r.code()).unwrap_or_default()
    }

    pub fn reply_string(&self) -> String {
        self.reply().map(|r| r.text()).unwrap_or_default()
    }

    pub fn reply_lines(&self) -> &[String] {
        self.reply().map(|r| r.lines()).unwrap_or_default()
    }

    pub fn control_encoding(&self) -> FtpControlEncoding {
        self.control
            .as_ref()
            .map(|c| c.encoding())
            .unwrap_or(self.config.control.encoding)
    }

    /// Open the control connection and read the greeting.
    ///
    /// Returns the greeting reply code, which should be checked for a
    /// positive completion.
    pub async fn connect(&mut self, host: &str, port: u16) -> Result<u16, FtpError> {
        if self.control.is_some() {
            self.disconnect().await;
        }

        let connected = tokio::time::timeout(
            self.config.connect_timeout,
            self.provider.new_control_connection(host, port),
        )
        .await
        .map_err(|_| FtpError::TimedOut("connect"))??;
        debug!(
            "ftp control connection {} -> {} established",
            connected.local_addr, connected.peer_addr
        );

        let mut control = FtpControlChannel::new(connected.stream, self.config.control.clone());
        control.set_listener(self.listener.clone());

        let greeting = async {
            loop {
                let code = control.read_reply().await?;
                if !reply_code::is_positive_preliminary(code) {
                    return Ok::<u16, FtpError>(code);
                }
            }
        };
        let code = tokio::time::timeout(self.config.greeting_timeout, greeting)
            .await
            .map_err(|_| FtpError::TimedOut("wait greeting"))??;

        self.control = Some(control);
        self.local_addr = Some(connected.local_addr);
        self.remote_addr = Some(connected.peer_addr);
        self.state.reset();

        if self.config.autodetect_utf8 {
            let greeting = self.control_mut()?.reply().clone();
            if self.has_feature("UTF8").await? || self.has_feature("UTF-8").await? {
                debug!("server supports UTF-8, switch control encoding");
                self.control_mut()?.set_encoding(FtpControlEncoding::Utf8);
            }
            self.control_mut()?.set_reply(greeting);
        }

        Ok(code)
    }

    /// Close the control connection and drop all cached session state.
    pub async fn disconnect(&mut self) {
        if let Some(mut control) = self.control.take() {
            let _ = control.shutdown().await;
        }
        self.local_addr = None;
        self.remote_addr = None;
        self.state.reset();
    }

    /// Send a command and read the reply, returns the reply code.
    ///
    /// Fails with [`FtpError::NotConnected`] before anything is written if
    /// there is no control connection.
    pub async fn send_command(&mut self, command: &str, args: Option<&str>) -> Result<u16, FtpError> {
        self.control_mut()?.send_command(command, args).await
    }

    /// Send an arbitrary command, `true` on a positive completion reply.
    pub async fn do_command(&mut self, command: &str, args: Option<&str>) -> Result<bool, FtpError> {
        let code = self.send_command(command, args).await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Send an arbitrary command, returns the reply lines on positive completion.
    pub async fn do_command_as_strings(
        &mut self,
        command: &str,
        args: Option<&str>,
    ) -> Result<Option<Vec<String>>, FtpError> {
        if self.do_command(command, args).await? {
            Ok(Some(self.reply_lines().to_vec()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr};

    use async_trait::async_trait;
    use tokio_test::io::{Builder, Mock};

    use crate::connection::{FtpConnectedStream, FtpDataListener};

    /// Provider handing out one scripted control stream and at most one
    /// scripted data stream, further data sockets are refused.
    pub(crate) struct MockProvider {
        control: Option<Mock>,
        pub(crate) peer_ip: IpAddr,
        data: Option<Mock>,
        data_peer_ip: Option<IpAddr>,
    }

    impl MockProvider {
        pub(crate) fn new(control: Mock) -> Self {
            MockProvider {
                control: Some(control),
                peer_ip: IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10)),
                data: None,
                data_peer_ip: None,
            }
        }

        /// Serve `data` on the next data connection, seen from `peer_ip`
        /// or from the requested address if unset.
        pub(crate) fn with_data(mut self, data: Mock, peer_ip: Option<IpAddr>) -> Self {
            self.data = Some(data);
            self.data_peer_ip = peer_ip;
            self
        }
    }

    pub(crate) struct NoListener;

    #[async_trait]
    impl FtpDataListener for NoListener {
        type Stream = Mock;

        fn local_addr(&self) -> io::Result<SocketAddr> {
            Err(io::Error::other("no listener"))
        }

        async fn accept(&mut self) -> io::Result<FtpConnectedStream<Mock>> {
            Err(io::Error::other("no listener"))
        }
    }

    #[async_trait]
    impl FtpConnectionProvider for MockProvider {
        type Stream = Mock;
        type Listener = NoListener;

        async fn new_control_connection(
            &mut self,
            _host: &str,
            port: u16,
        ) -> io::Result<FtpConnectedStream<Mock>> {
            let stream = self
                .control
                .take()
                .ok_or_else(|| io::Error::from(io::ErrorKind::ConnectionRefused))?;
            Ok(FtpConnectedStream {
                stream,
                local_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 40000),
                peer_addr: SocketAddr::new(self.peer_ip, port),
            })
        }

        async fn new_data_connection(
            &mut self,
            server_addr: SocketAddr,
        ) -> io::Result<FtpConnectedStream<Mock>> {
            let stream = self
                .data
                .take()
                .ok_or_else(|| io::Error::from(io::ErrorKind::ConnectionRefused))?;
            let peer_ip = self.data_peer_ip.unwrap_or(server_addr.ip());
            Ok(FtpConnectedStream {
                stream,
                local_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 40001),
                peer_addr: SocketAddr::new(peer_ip, server_addr.port()),
            })
        }

        async fn new_data_listener(&mut self, _bind_addr: SocketAddr) -> io::Result<NoListener> {
            Err(io::Error::from(io::ErrorKind::AddrInUse))
        }
    }

    pub(crate) async fn connected_client(control: Mock) -> FtpClient<MockProvider> {
        connected_client_with(control, FtpClientConfig::default()).await
    }

    pub(crate) async fn connected_client_with(
        control: Mock,
        config: FtpClientConfig,
    ) -> FtpClient<MockProvider> {
        connected_client_on(MockProvider::new(control), config).await
    }

    pub(crate) async fn connected_client_on(
        provider: MockProvider,
        config: FtpClientConfig,
    ) -> FtpClient<MockProvider> {
        let mut client = FtpClient::with_provider(config, provider);
        let code = client.connect("ftp.example.net", 21).await.unwrap();
        assert_eq!(code, 220);
        client
    }

    #[tokio::test]
    async fn not_connected() {
        let mut client = FtpClient::new(FtpClientConfig::default());
        let e = client.send_command("NOOP", None).await.unwrap_err();
        assert!(matches!(e, FtpError::NotConnected));
        assert_eq!(client.reply_code(), 0);
    }

    #[tokio::test]
    async fn greeting_after_preliminary() {
        let control = Builder::new()
            .read(b"120 Service ready in 1 minute.\r\n")
            .read(b"220 Service ready.\r\n")
            .build();
        let client = connected_client(control).await;
        assert!(client.is_connected());
        assert_eq!(client.reply_code(), 220);
        assert_eq!(client.reply_string(), "220 Service ready.\r\n");
    }

    #[tokio::test]
    async fn greeting_service_not_available() {
        let control = Builder::new().read(b"421 Too many users.\r\n").build();
        let mut client =
            FtpClient::with_provider(FtpClientConfig::default(), MockProvider::new(control));
        let e = client.connect("ftp.example.net", 21).await.unwrap_err();
        assert!(e.is_connection_closed());
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn autodetect_utf8() {
        let control = Builder::new()
            .read(b"220 Welcome\r\n")
            .write(b"FEAT\r\n")
            .read(b"211-Features:\r\n UTF8\r\n MDTM\r\n211 End\r\n")
            .build();
        let config = FtpClientConfig {
            autodetect_utf8: true,
            ..Default::default()
        };
        let client = connected_client_with(control, config).await;
        assert_eq!(client.control_encoding(), FtpControlEncoding::Utf8);
        assert_eq!(client.reply_code(), 220);
        assert_eq!(client.reply_lines(), ["220 Welcome"]);
    }

    #[tokio::test]
    async fn do_command_strings() {
        let control = Builder::new()
            .read(b"220 Welcome\r\n")
            .write(b"SITE CHMOD 644 a.txt\r\n")
            .read(b"200 CHMOD command successful.\r\n")
            .write(b"XCRC a.txt\r\n")
            .read(b"500 Unknown command.\r\n")
            .build();
        let mut client = connected_client(control).await;
        let lines = client
            .do_command_as_strings("SITE", Some("CHMOD 644 a.txt"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lines, ["200 CHMOD command successful."]);
        assert!(!client.do_command("XCRC", Some("a.txt")).await.unwrap());
        assert_eq!(client.reply_code(), 500);
    }

    #[tokio::test]
    async fn disconnect_resets() {
        let control = Builder::new()
            .read(b"220 Welcome\r\n")
            .write(b"SYST\r\n")
            .read(b"215 UNIX Type: L8\r\n")
            .build();
        let mut client = connected_client(control).await;
        assert_eq!(client.get_system_type().await.unwrap(), "UNIX Type: L8");
        assert_eq!(client.state().system_type(), Some("UNIX Type: L8"));
        client.disconnect().await;
        assert!(!client.is_connected());
        assert!(client.state().system_type().is_none());
        let e = client.send_command("NOOP", None).await.unwrap_err();
        assert!(matches!(e, FtpError::NotConnected));
    }
}
