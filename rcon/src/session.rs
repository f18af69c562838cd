//! Authenticated RCON session over TCP.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::codec::{Packet, PacketKind, PacketReader, PacketWriter};
use crate::{RconError, RconSettings};

/// Request id the server uses to signal a rejected password.
const AUTH_REJECTED_ID: i32 = -1;

async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, RconError>
where
    F: Future<Output = Result<T, RconError>>,
{
    match time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(RconError::Timeout(limit)),
    }
}

/// One open, authenticated connection.
///
/// Commands are strictly request/response: the session is not safe to share
/// between concurrent callers, which `&mut self` on [`RconSession::execute`]
/// enforces.
pub struct RconSession {
    reader: PacketReader<OwnedReadHalf>,
    writer: PacketWriter<OwnedWriteHalf>,
    next_id: i32,
    timeout: Duration,
}

impl RconSession {
    /// Connect and authenticate.
    pub async fn connect(settings: &RconSettings) -> Result<Self, RconError> {
        let timeout = settings.timeout();
        let address = settings.address();
        let stream = bounded(timeout, async {
            TcpStream::connect(&address).await.map_err(RconError::from)
        })
        .await?;
        stream.set_nodelay(true)?;

        let (read_half, write_half) = stream.into_split();
        let mut session = Self {
            reader: PacketReader::new(read_half),
            writer: PacketWriter::new(write_half),
            next_id: 0,
            timeout,
        };
        session.login(&settings.password).await?;
        tracing::debug!(address = %address, "RCON session authenticated");
        Ok(session)
    }

    fn allocate_id(&mut self) -> i32 {
        // Stay positive: -1 is reserved for auth rejection.
        self.next_id = if self.next_id == i32::MAX {
            1
        } else {
            self.next_id + 1
        };
        self.next_id
    }

    async fn send_packet(&mut self, packet: &Packet) -> Result<(), RconError> {
        bounded(self.timeout, self.writer.write_packet(packet)).await
    }

    async fn receive_packet(&mut self) -> Result<Packet, RconError> {
        bounded(self.timeout, self.reader.read_packet())
            .await?
            .ok_or(RconError::Closed)
    }

    async fn login(&mut self, password: &str) -> Result<(), RconError> {
        let id = self.allocate_id();
        self.send_packet(&Packet::new(id, PacketKind::LOGIN, password))
            .await?;

        loop {
            let reply = self.receive_packet().await?;
            if reply.id == AUTH_REJECTED_ID {
                return Err(RconError::AuthenticationFailed);
            }
            // Some servers send an empty RESPONSE before the auth reply.
            if reply.kind == PacketKind::AUTH_RESPONSE && reply.id == id {
                return Ok(());
            }
            tracing::debug!(id = reply.id, "Skipping pre-auth packet");
        }
    }

    /// Send one console command and return the server's response text.
    pub async fn execute(&mut self, command: &str) -> Result<String, RconError> {
        let id = self.allocate_id();
        self.send_packet(&Packet::new(id, PacketKind::COMMAND, command))
            .await?;

        // TODO: responses over 4096 bytes arrive split across packets; only the
        // first fragment is returned until a sentinel-packet read is added.
        loop {
            let reply = self.receive_packet().await?;
            if reply.id == id {
                tracing::debug!(command, response = %reply.body, "RCON response");
                return Ok(reply.body);
            }
            if reply.id == AUTH_REJECTED_ID {
                return Err(RconError::AuthenticationFailed);
            }
            tracing::debug!(expected = id, got = reply.id, "Skipping stray RCON packet");
        }
    }

    /// Close the write side; the server then drops the connection.
    pub async fn disconnect(mut self) -> Result<(), RconError> {
        bounded(self.timeout, self.writer.shutdown()).await
    }
}
