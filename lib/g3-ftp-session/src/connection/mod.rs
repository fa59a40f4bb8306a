/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

mod tcp;
pub use tcp::{TcpConnectionProvider, TcpDataListener};

/// A connected stream with the addresses of both ends.
pub struct FtpConnectedStream<S> {
    pub stream: S,
    pub local_addr: SocketAddr,
    pub peer_addr: SocketAddr,
}

#[async_trait]
pub trait FtpDataListener: Send {
    type Stream;

    fn local_addr(&self) -> io::Result<SocketAddr>;
    async fn accept(&mut self) -> io::Result<FtpConnectedStream<Self::Stream>>;
}

/// Creates the sockets used by the client.
///
/// Timeouts are applied by the caller.
#[async_trait]
pub trait FtpConnectionProvider: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;
    type Listener: FtpDataListener<Stream = Self::Stream>;

    async fn new_control_connection(
        &mut self,
        host: &str,
        port: u16,
    ) -> io::Result<FtpConnectedStream<Self::Stream>>;

    async fn new_data_connection(
        &mut self,
        server_addr: SocketAddr,
    ) -> io::Result<FtpConnectedStream<Self::Stream>>;

    async fn new_data_listener(&mut self, bind_addr: SocketAddr) -> io::Result<Self::Listener>;
}
