/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use super::{FtpConnectedStream, FtpConnectionProvider, FtpDataListener};

#[derive(Default)]
pub struct TcpConnectionProvider {
    bind_ip: Option<IpAddr>,
}

impl TcpConnectionProvider {
    pub fn set_bind_ip(&mut self, ip: IpAddr) {
        self.bind_ip = Some(ip);
    }

    async fn connect(&self, addr: SocketAddr) -> io::Result<FtpConnectedStream<TcpStream>> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        if let Some(ip) = self.bind_ip {
            socket.bind(SocketAddr::new(ip, 0))?;
        }
        let stream = socket.connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(FtpConnectedStream {
            local_addr: stream.local_addr()?,
            peer_addr: stream.peer_addr()?,
            stream,
        })
    }
}

#[async_trait]
impl FtpConnectionProvider for TcpConnectionProvider {
    type Stream = TcpStream;
    type Listener = TcpDataListener;

    async fn new_control_connection(
        &mut self,
        host: &str,
        port: u16,
    ) -> io::Result<FtpConnectedStream<TcpStream>> {
        let mut err = io::Error::new(io::ErrorKind::AddrNotAvailable, "no addr resolved");
        for addr in tokio::net::lookup_host((host, port)).await? {
            if let Some(ip) = self.bind_ip
                && ip.is_ipv4() != addr.is_ipv4()
            {
                continue;
            }
            match self.connect(addr).await {
                Ok(stream) => return Ok(stream),
                Err(e) => err = e,
            }
        }

        Err(err)
    }

    async fn new_data_connection(
        &mut self,
        server_addr: SocketAddr,
    ) -> io::Result<FtpConnectedStream<TcpStream>> {
        self.connect(server_addr).await
    }

    async fn new_data_listener(&mut self, bind_addr: SocketAddr) -> io::Result<TcpDataListener> {
        let listener = TcpListener::bind(bind_addr).await?;
        Ok(TcpDataListener { inner: listener })
    }
}

pub struct TcpDataListener {
    inner: TcpListener,
}

#[async_trait]
impl FtpDataListener for TcpDataListener {
    type Stream = TcpStream;

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    async fn accept(&mut self) -> io::Result<FtpConnectedStream<TcpStream>> {
        let (stream, peer_addr) = self.inner.accept().await?;
        Ok(FtpConnectedStream {
            local_addr: stream.local_addr()?,
            peer_addr,
            stream,
        })
    }
}
