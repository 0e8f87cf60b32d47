use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::driver_config::address;
use super::RmiConfig;
use crate::errors::{FrcError, Result};
use crate::framer::{self, MessageFramer};
use crate::packets::{Communication, Response, SendPacket};

const READ_CHUNK: usize = 4096;

/// Open a TCP connection, retrying with a fixed delay.
///
/// Each attempt is bounded by `connect_timeout`. After `attempts` failures the
/// last error is reported as [`FrcError::ConnectionUnavailable`].
pub async fn connect_with_retry(
    addr: &str,
    attempts: u32,
    retry_delay: Duration,
    connect_timeout: Duration,
) -> Result<TcpStream> {
    let attempts = attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                debug!(addr, attempt, "tcp connection established");
                return Ok(stream);
            }
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("timed out after {:?}", connect_timeout),
        }
        warn!(addr, attempt, attempts, error = %last_error, "connect attempt failed");
        if attempt < attempts {
            sleep(retry_delay).await;
        }
    }

    Err(FrcError::ConnectionUnavailable {
        addr: addr.to_string(),
        attempts,
        last_error,
    })
}

struct Session {
    stream: TcpStream,
    framer: MessageFramer,
    poisoned: bool,
}

/// One live controller socket and its receive buffer.
///
/// Every request goes through [`RmiConnection::send`], which holds an internal
/// lock from the moment the request is written until its reply is decoded.
/// The protocol correlates replies by order alone, so at most one request is
/// ever outstanding.
pub struct RmiConnection {
    session: Mutex<Session>,
    peer: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl RmiConnection {
    pub fn new(stream: TcpStream, read_timeout: Duration, write_timeout: Duration) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            session: Mutex::new(Session {
                stream,
                framer: MessageFramer::new(),
                poisoned: false,
            }),
            peer,
            read_timeout,
            write_timeout,
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// True once an I/O or decode failure has desynchronized the stream.
    pub async fn is_poisoned(&self) -> bool {
        self.session.lock().await.poisoned
    }

    /// Write one request and wait for exactly one reply.
    ///
    /// A non-zero `ErrorID` is not checked here; see [`Response::into_result`].
    pub async fn send(&self, packet: &SendPacket) -> Result<Response> {
        let mut session = self.session.lock().await;
        if session.poisoned {
            return Err(FrcError::NotConnected);
        }

        let result = self.exchange(&mut session, packet).await;
        if let Err(e) = &result {
            if e.poisons_connection() {
                warn!(peer = %self.peer, error = %e, "connection is no longer usable");
                session.poisoned = true;
            }
        }
        result
    }

    async fn exchange(&self, session: &mut Session, packet: &SendPacket) -> Result<Response> {
        let message = packet.to_message()?;
        let bytes = framer::encode(&message)?;
        debug!(peer = %self.peer, "sent: {}", String::from_utf8_lossy(&bytes).trim_end());

        match timeout(self.write_timeout, session.stream.write_all(&bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(FrcError::FailedToSend(e.to_string())),
            Err(_) => {
                return Err(FrcError::FailedToSend(format!(
                    "write timed out after {:?}",
                    self.write_timeout
                )))
            }
        }

        let response = match timeout(self.read_timeout, read_response(session)).await {
            Ok(result) => result?,
            Err(_) => return Err(FrcError::ReadTimeout(self.read_timeout)),
        };
        debug!(peer = %self.peer, "received: {}", serde_json::Value::Object(response.message().clone()));

        let class = packet.class_key();
        let requested = message.get(class).and_then(Value::as_str);
        if let (Some((reply_class, reply_name)), Some(requested)) = (response.kind(), requested) {
            if reply_class == class && reply_name != requested {
                warn!(
                    peer = %self.peer,
                    requested,
                    received = reply_name,
                    "response does not match the request it was read for"
                );
            }
        }
        Ok(response)
    }

    /// Shut the socket down. Errors are ignored; the peer may already be gone.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        session.poisoned = true;
        let _ = session.stream.shutdown().await;
    }
}

async fn read_response(session: &mut Session) -> Result<Response> {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        if let Some(message) = session.framer.next_message() {
            return message.map(Response::new);
        }
        let n = session
            .stream
            .read(&mut buf)
            .await
            .map_err(|e| {
                debug!("read failed: {}", e);
                FrcError::ConnectionClosed
            })?;
        if n == 0 {
            return Err(FrcError::ConnectionClosed);
        }
        session.framer.extend(&buf[..n]);
    }
}

/// Run the startup-port conversation and return the port to use for traffic.
///
/// The reply may carry the operational port as `Port` or `PortNumber`; when it
/// carries neither, `config.main_port` stands.
pub async fn handshake(config: &RmiConfig) -> Result<u16> {
    let addr = address(&config.host, config.startup_port);
    let stream = connect_with_retry(
        &addr,
        config.attempts,
        config.retry_delay,
        config.connect_timeout,
    )
    .await?;
    let startup = RmiConnection::new(stream, config.read_timeout, config.write_timeout);

    let reply = startup
        .send(&SendPacket::Communication(Communication::FrcConnect))
        .await;
    startup.shutdown().await;
    let reply = reply?.into_result()?;

    match assigned_port(&reply)? {
        Some(port) => {
            if port != config.main_port {
                info!(startup = %addr, port, "controller reassigned the main port");
            }
            Ok(port)
        }
        None => Ok(config.main_port),
    }
}

fn assigned_port(reply: &Response) -> Result<Option<u16>> {
    let Some(value) = reply.get("Port").or_else(|| reply.get("PortNumber")) else {
        return Ok(None);
    };
    let port = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        Value::Null => return Ok(None),
        _ => None,
    };
    match port {
        Some(port) if port != 0 => Ok(Some(port)),
        _ => Err(FrcError::ProtocolDecode(format!(
            "handshake reply carries an invalid port: {}",
            value
        ))),
    }
}
