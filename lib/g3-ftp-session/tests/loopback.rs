/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};

use g3_ftp_session::{
    FtpClient, FtpClientConfig, FtpFileType, FtpTextFormat, FtpTransferConfig, filter,
};

#[derive(Default)]
struct ServerState {
    files: HashMap<String, Vec<u8>>,
    listing: Vec<String>,
    noop_count: usize,
    active_ports: Vec<u16>,
}

type SharedState = Arc<Mutex<ServerState>>;

/// A single threaded FTP server good enough for the client.
struct LoopbackServer {
    addr: SocketAddr,
    state: SharedState,
}

impl LoopbackServer {
    async fn start(listing: &[&str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState {
            listing: listing.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }));

        let session_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = session_state.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, state).await;
                });
            }
        });
        LoopbackServer { addr, state }
    }

    fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(name).cloned()
    }

    fn put_file(&self, name: &str, data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(name.to_string(), data.to_vec());
    }

    fn noop_count(&self) -> usize {
        self.state.lock().unwrap().noop_count
    }

    fn active_ports(&self) -> Vec<u16> {
        self.state.lock().unwrap().active_ports.clone()
    }
}

enum DataSide {
    None,
    Passive(TcpListener),
    Active(SocketAddr),
}

impl DataSide {
    async fn open(&mut self) -> std::io::Result<TcpStream> {
        match std::mem::replace(self, DataSide::None) {
            DataSide::Passive(listener) => listener.accept().await.map(|(s, _)| s),
            DataSide::Active(addr) => TcpStream::connect(addr).await,
            DataSide::None => Err(std::io::Error::other("no data port")),
        }
    }
}

async fn reply(w: &mut OwnedWriteHalf, msg: &str) -> std::io::Result<()> {
    w.write_all(msg.as_bytes()).await?;
    w.write_all(b"\r\n").await
}

fn parse_port_arg(arg: &str) -> Option<SocketAddr> {
    let n: Vec<u8> = arg
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<_, _>>()
        .ok()?;
    if n.len() != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(n[0], n[1], n[2], n[3]);
    Some(SocketAddr::new(ip.into(), u16::from(n[4]) * 256 + u16::from(n[5])))
}

fn parse_eprt_arg(arg: &str) -> Option<SocketAddr> {
    let parts: Vec<&str> = arg.split('|').collect();
    if parts.len() != 5 {
        return None;
    }
    Some(SocketAddr::new(parts[2].parse().ok()?, parts[3].parse().ok()?))
}

async fn serve(stream: TcpStream, state: SharedState) -> std::io::Result<()> {
    let (r, mut w) = stream.into_split();
    let mut lines = BufReader::new(r).lines();
    let mut data = DataSide::None;

    reply(&mut w, "220 loopback ready").await?;
    while let Some(line) = lines.next_line().await? {
        let (cmd, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => reply(&mut w, "331 Password required").await?,
            "PASS" => reply(&mut w, "230 Logged in").await?,
            "SYST" => reply(&mut w, "215 UNIX Type: L8").await?,
            "TYPE" => reply(&mut w, "200 Type set").await?,
            "NOOP" => reply(&mut w, "200 NOOP ok").await?,
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await?;
                let port = listener.local_addr()?.port();
                data = DataSide::Passive(listener);
                let msg = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).",
                    port >> 8,
                    port & 0xff
                );
                reply(&mut w, &msg).await?;
            }
            "EPSV" => {
                let listener = TcpListener::bind("127.0.0.1:0").await?;
                let port = listener.local_addr()?.port();
                data = DataSide::Passive(listener);
                let msg = format!("229 Entering Extended Passive Mode (|||{port}|)");
                reply(&mut w, &msg).await?;
            }
            "PORT" | "EPRT" => {
                let addr = if cmd.eq_ignore_ascii_case("PORT") {
                    parse_port_arg(arg)
                } else {
                    parse_eprt_arg(arg)
                };
                match addr {
                    Some(addr) => {
                        state.lock().unwrap().active_ports.push(addr.port());
                        data = DataSide::Active(addr);
                        reply(&mut w, "200 Port ok").await?;
                    }
                    None => reply(&mut w, "501 Bad port").await?,
                }
            }
            "STOR" | "APPE" => {
                reply(&mut w, "150 Ok to send data").await?;
                let mut conn = data.open().await?;
                let mut received = Vec::new();
                let mut buf = [0u8; 4096];
                // keep serving NOOPs while the data is coming in
                loop {
                    tokio::select! {
                        r = conn.read(&mut buf) => {
                            let n = r?;
                            if n == 0 {
                                break;
                            }
                            received.extend_from_slice(&buf[..n]);
                        }
                        l = lines.next_line() => {
                            match l? {
                                Some(l) if l.eq_ignore_ascii_case("NOOP") => {
                                    state.lock().unwrap().noop_count += 1;
                                    reply(&mut w, "200 NOOP ok").await?;
                                }
                                Some(_) => reply(&mut w, "503 Busy").await?,
                                None => return Ok(()),
                            }
                        }
                    }
                }
                {
                    let mut state = state.lock().unwrap();
                    let file = state.files.entry(arg.to_string()).or_default();
                    if cmd.eq_ignore_ascii_case("STOR") {
                        file.clear();
                    }
                    file.extend_from_slice(&received);
                }
                reply(&mut w, "226 Transfer complete").await?;
            }
            "RETR" => {
                let content = state.lock().unwrap().files.get(arg).cloned();
                let Some(content) = content else {
                    reply(&mut w, "550 No such file").await?;
                    continue;
                };
                reply(&mut w, "150 Opening data connection").await?;
                let mut conn = data.open().await?;
                conn.write_all(&content).await?;
                conn.shutdown().await?;
                drop(conn);
                reply(&mut w, "226 Transfer complete").await?;
            }
            "LIST" | "NLST" | "MLSD" => {
                let listing = state.lock().unwrap().listing.clone();
                reply(&mut w, "150 Here comes the listing").await?;
                let mut conn = data.open().await?;
                for entry in listing {
                    let entry = if cmd.eq_ignore_ascii_case("NLST") {
                        entry
                            .rsplit(' ')
                            .next()
                            .unwrap_or_default()
                            .to_string()
                    } else {
                        entry
                    };
                    conn.write_all(entry.as_bytes()).await?;
                    conn.write_all(b"\r\n").await?;
                }
                conn.shutdown().await?;
                drop(conn);
                reply(&mut w, "226 Directory send OK").await?;
            }
            "QUIT" => {
                reply(&mut w, "221 Goodbye").await?;
                break;
            }
            _ => reply(&mut w, "502 Command not implemented").await?,
        }
    }
    Ok(())
}

async fn logged_in(server: &LoopbackServer, config: FtpClientConfig) -> FtpClient {
    let mut client = FtpClient::new(config);
    let code = client
        .connect(&server.addr.ip().to_string(), server.addr.port())
        .await
        .unwrap();
    assert_eq!(code, 220);
    assert!(client.login("anonymous", "guest@").await.unwrap());
    client
}

fn quick_config() -> FtpClientConfig {
    FtpClientConfig {
        transfer: FtpTransferConfig {
            data_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn passive_binary_round_trip() {
    let server = LoopbackServer::start(&[]).await;
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_passive_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    let blob: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
    assert!(client.store_file("blob.bin", &mut &blob[..]).await.unwrap());
    assert_eq!(server.file("blob.bin").unwrap(), blob);

    let mut downloaded = Vec::new();
    assert!(client.retrieve_file("blob.bin", &mut downloaded).await.unwrap());
    assert_eq!(downloaded, blob);

    assert!(client.logout().await.unwrap());
    client.disconnect().await;
}

#[tokio::test]
async fn active_ascii_round_trip() {
    let server = LoopbackServer::start(&[]).await;
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_active_mode();
    assert!(
        client
            .set_file_type(FtpFileType::Ascii(FtpTextFormat::NonPrint))
            .await
            .unwrap()
    );

    let text = b"first line\nsecond line\n\nlast line without newline";
    assert!(client.store_file("notes.txt", &mut &text[..]).await.unwrap());
    assert_eq!(
        server.file("notes.txt").unwrap(),
        b"first line\r\nsecond line\r\n\r\nlast line without newline"
    );

    let mut downloaded = Vec::new();
    assert!(client.retrieve_file("notes.txt", &mut downloaded).await.unwrap());
    assert_eq!(downloaded, text);
}

#[tokio::test]
async fn active_port_range() {
    let server = LoopbackServer::start(&[]).await;
    let config = FtpClientConfig {
        active_port_range: (40000, 60000),
        ..quick_config()
    };
    let mut client = logged_in(&server, config).await;
    client.enter_local_active_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    assert!(client.store_file("r.bin", &mut &b"ranged"[..]).await.unwrap());
    let mut downloaded = Vec::new();
    assert!(client.retrieve_file("r.bin", &mut downloaded).await.unwrap());
    assert_eq!(downloaded, b"ranged");

    let ports = server.active_ports();
    assert_eq!(ports.len(), 2);
    assert!(ports.iter().all(|p| (40000..=60000).contains(p)));
}

#[tokio::test]
async fn extended_passive_with_ipv4() {
    let server = LoopbackServer::start(&[]).await;
    let config = FtpClientConfig {
        use_epsv_with_ipv4: true,
        ..quick_config()
    };
    let mut client = logged_in(&server, config).await;
    client.enter_local_passive_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    assert!(client.store_file("a.bin", &mut &b"abc"[..]).await.unwrap());
    assert!(client.append_file("a.bin", &mut &b"def"[..]).await.unwrap());
    let mut downloaded = Vec::new();
    assert!(client.retrieve_file("a.bin", &mut downloaded).await.unwrap());
    assert_eq!(downloaded, b"abcdef");
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let server = LoopbackServer::start(&[]).await;
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_passive_mode();

    let mut downloaded = Vec::new();
    assert!(!client.retrieve_file("nothere", &mut downloaded).await.unwrap());
    assert_eq!(client.reply_code(), 550);
    assert!(downloaded.is_empty());

    // the session is still in sync
    assert!(client.send_noop().await.unwrap());
}

#[tokio::test]
async fn keepalive_during_upload() {
    let server = LoopbackServer::start(&[]).await;
    let config = FtpClientConfig {
        transfer: FtpTransferConfig {
            buffer_size: 1024,
            data_timeout: Some(Duration::from_secs(5)),
            control_keepalive_timeout: Some(Duration::from_nanos(1)),
            control_keepalive_reply_timeout: Duration::from_secs(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut client = logged_in(&server, config).await;
    client.enter_local_passive_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    let blob = vec![7u8; 16 * 1024];
    assert!(client.store_file("big.bin", &mut &blob[..]).await.unwrap());
    assert_eq!(server.file("big.bin").unwrap().len(), blob.len());
    assert!(server.noop_count() > 0);

    // no stray NOOP reply is left behind
    assert!(client.send_noop().await.unwrap());
    assert_eq!(client.reply_string(), "200 NOOP ok\r\n");
}

#[tokio::test]
async fn streaming_download() {
    let server = LoopbackServer::start(&[]).await;
    server.put_file("s.bin", b"streamed content");
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_passive_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    let mut stream = client.retrieve_file_stream("s.bin").await.unwrap().unwrap();
    let mut content = Vec::new();
    stream.read_to_end(&mut content).await.unwrap();
    drop(stream);
    assert!(client.complete_pending_command().await.unwrap());
    assert_eq!(content, b"streamed content");

    let mut upload = client.store_file_stream("u.bin").await.unwrap().unwrap();
    upload.write_all(b"uploaded").await.unwrap();
    upload.shutdown().await.unwrap();
    drop(upload);
    assert!(client.complete_pending_command().await.unwrap());
    assert_eq!(server.file("u.bin").unwrap(), b"uploaded");
}

#[tokio::test]
async fn copy_progress_listener() {
    let server = LoopbackServer::start(&[]).await;
    server.put_file("p.bin", &[1u8; 5000]);
    let config = FtpClientConfig {
        transfer: FtpTransferConfig {
            buffer_size: 1000,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut client = logged_in(&server, config).await;
    client.enter_local_passive_mode();
    assert!(client.set_file_type(FtpFileType::Binary).await.unwrap());

    let seen = Arc::new(Mutex::new(0u64));
    let seen_by_listener = seen.clone();
    client.set_copy_stream_listener(Some(Box::new(
        move |total: u64, _bytes: usize, _size: Option<u64>| {
            *seen_by_listener.lock().unwrap() = total;
        },
    )));
    let mut downloaded = Vec::new();
    assert!(client.retrieve_file("p.bin", &mut downloaded).await.unwrap());
    assert_eq!(*seen.lock().unwrap(), 5000);
}

const UNIX_LISTING: &[&str] = &[
    "total 16",
    "drwxr-xr-x   2 ftp ftp 4096 Jan  5  2020 incoming",
    "-rw-r--r--   1 ftp ftp 1024 Jan  5  2020 a.txt",
    "-rw-r--r--   1 ftp ftp 2048 Feb  6  2020 b.txt",
    "lrwxrwxrwx   1 ftp ftp    5 Feb  6  2020 latest -> b.txt",
    "drwxr-xr-x   2 ftp ftp 4096 Mar  7  2020 pub",
];

#[tokio::test]
async fn listing_paged_and_bulk() {
    let server = LoopbackServer::start(UNIX_LISTING).await;
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_passive_mode();

    let files = client.list_files(None).await.unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["incoming", "a.txt", "b.txt", "latest", "pub"]);
    assert_eq!(files[3].link(), Some("b.txt"));

    let mut engine = client.initiate_list_parsing(None, Some("/")).await.unwrap();
    let mut paged = Vec::new();
    while engine.has_next() {
        paged.extend(engine.get_next(2).into_iter().flatten());
    }
    assert_eq!(paged, files);

    let dirs = client.list_directories(None).await.unwrap();
    assert_eq!(dirs.len(), 2);
    let all = client.list_files_filtered(None, &filter::All).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn listing_names_and_mlsd() {
    let server = LoopbackServer::start(&[
        "type=dir;modify=20200105101010; incoming",
        "type=file;size=1024;modify=20200105101010; a.txt",
    ])
    .await;
    let mut client = logged_in(&server, quick_config()).await;
    client.enter_local_passive_mode();

    let names = client.list_names(None).await.unwrap().unwrap();
    assert_eq!(names, ["incoming", "a.txt"]);

    let files = client.mlist_dir(None).await.unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].is_directory());
    assert_eq!(files[1].size(), 1024);
}
