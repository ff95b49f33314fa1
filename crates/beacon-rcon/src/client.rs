//! Real remote-console endpoint over a Tokio TCP stream.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::packet::{AUTH_FAILED_ID, Packet, TYPE_AUTH, TYPE_EXEC};
use crate::{RconEndpoint, RconError};

/// A remote-console client speaking Source RCON framing.
///
/// Holds at most one TCP connection. Every network operation is bounded
/// by the configured timeout — a stalled server produces
/// [`RconError::Timeout`], never a hang. After a timeout or I/O failure
/// the stream is dropped so the next connect starts clean.
pub struct RconClient {
    addr: String,
    password: String,
    timeout: Duration,
    stream: Option<TcpStream>,
    next_id: i32,
}

impl RconClient {
    /// Creates an unconnected client for the given endpoint.
    pub fn new(host: &str, port: u16, password: &str, timeout: Duration) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            password: password.to_string(),
            timeout,
            stream: None,
            next_id: 1,
        }
    }

    /// `true` while a TCP connection is held.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        // Wrap well below the sign bit; -1 is reserved for auth failure.
        self.next_id = if id >= i32::MAX - 1 { 1 } else { id + 1 };
        id
    }

    /// Runs one request/response exchange on the held stream.
    ///
    /// The response with the matching id ends the exchange; unmatched
    /// packets (e.g. the empty padding response some servers emit before
    /// an auth reply) are skipped.
    async fn round_trip(&mut self, packet: Packet) -> Result<Packet, RconError> {
        let stream = self.stream.as_mut().ok_or(RconError::ConnectionLost)?;

        let exchange = async {
            stream
                .write_all(&packet.encode())
                .await
                .map_err(RconError::SendFailed)?;

            loop {
                let response = read_packet(stream).await?;
                if response.id == packet.id || response.id == AUTH_FAILED_ID {
                    return Ok(response);
                }
                tracing::trace!(
                    id = response.id,
                    expected = packet.id,
                    "skipping unmatched packet"
                );
            }
        };

        let result = tokio::time::timeout(self.timeout, exchange).await;
        match result {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                self.stream = None;
                Err(e)
            }
            Err(_) => {
                self.stream = None;
                Err(RconError::Timeout(self.timeout))
            }
        }
    }
}

impl RconEndpoint for RconClient {
    async fn connect(&mut self) -> Result<(), RconError> {
        let stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
                .await
            {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(RconError::ConnectFailed(e)),
                Err(_) => return Err(RconError::Timeout(self.timeout)),
            };
        self.stream = Some(stream);

        let id = self.next_id();
        let auth = Packet::new(id, TYPE_AUTH, self.password.clone());
        let response = self.round_trip(auth).await?;

        if response.id == AUTH_FAILED_ID {
            self.stream = None;
            return Err(RconError::AuthRejected);
        }

        tracing::debug!(addr = %self.addr, "remote console authenticated");
        Ok(())
    }

    async fn send(&mut self, command: &str) -> Result<String, RconError> {
        let id = self.next_id();
        let request = Packet::new(id, TYPE_EXEC, command);
        let response = self.round_trip(request).await?;
        Ok(response.body)
    }

    async fn disconnect(&mut self) -> Result<(), RconError> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await.map_err(RconError::SendFailed)?;
        }
        Ok(())
    }
}

/// Reads one length-prefixed packet from the stream.
async fn read_packet(stream: &mut TcpStream) -> Result<Packet, RconError> {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).await.map_err(map_read_err)?;

    let frame_len = Packet::frame_len(prefix)?;
    let mut frame = vec![0u8; frame_len];
    stream.read_exact(&mut frame).await.map_err(map_read_err)?;

    Packet::decode(&frame)
}

fn map_read_err(e: std::io::Error) -> RconError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        RconError::ConnectionLost
    } else {
        RconError::SendFailed(e)
    }
}
