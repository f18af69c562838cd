//! RCON packet framing.
//!
//! Each packet is `length: i32 LE` followed by `length` bytes:
//! `request_id: i32 LE`, `type: i32 LE`, the body, and two NUL bytes.
//! This module provides [`PacketReader`] and [`PacketWriter`] for async
//! reading and writing of framed packets.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::RconError;

/// Id + type + two trailing NULs.
const HEADER_AND_PADDING: usize = 10;

/// Largest body the server accepts from a client.
pub const MAX_COMMAND_BYTES: usize = 1446;

/// Largest body a single server packet carries.
pub const MAX_RESPONSE_BYTES: usize = 4096;

/// Packet type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketKind(i32);

impl PacketKind {
    pub const RESPONSE: Self = Self(0);
    /// Client command; servers reuse the same value for the login reply.
    pub const COMMAND: Self = Self(2);
    pub const AUTH_RESPONSE: Self = Self(2);
    pub const LOGIN: Self = Self(3);

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: PacketKind,
    pub body: String,
}

impl Packet {
    #[must_use]
    pub fn new(id: i32, kind: PacketKind, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    fn encode(&self) -> Vec<u8> {
        let body = self.body.as_bytes();
        let length = (HEADER_AND_PADDING + body.len()) as i32;
        let mut out = Vec::with_capacity(4 + HEADER_AND_PADDING + body.len());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.kind.value().to_le_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&[0, 0]);
        out
    }
}

fn read_i32(bytes: &[u8]) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(buf)
}

/// Reads RCON packets from an async reader.
pub struct PacketReader<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin> PacketReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` on EOF before any byte of a packet (clean shutdown).
    /// Returns `Err` on truncated, undersized, or oversized packets.
    pub async fn read_packet(&mut self) -> Result<Option<Packet>, RconError> {
        let mut length_buf = [0u8; 4];
        let first = self.reader.read(&mut length_buf[..1]).await?;
        if first == 0 {
            return Ok(None);
        }
        self.reader.read_exact(&mut length_buf[1..]).await?;

        let length = i32::from_le_bytes(length_buf);
        let length = usize::try_from(length)
            .map_err(|_| RconError::Protocol(format!("negative packet length {length}")))?;
        if length < HEADER_AND_PADDING {
            return Err(RconError::Protocol(format!(
                "packet length {length} is below minimum {HEADER_AND_PADDING}"
            )));
        }
        if length > MAX_RESPONSE_BYTES + HEADER_AND_PADDING {
            return Err(RconError::PayloadTooLarge {
                len: length - HEADER_AND_PADDING,
                max: MAX_RESPONSE_BYTES,
            });
        }

        let mut payload = vec![0u8; length];
        self.reader.read_exact(&mut payload).await?;

        if payload[length - 2..] != [0, 0] {
            return Err(RconError::Protocol("packet is not NUL-terminated".into()));
        }

        let id = read_i32(&payload[0..4]);
        let kind = PacketKind(read_i32(&payload[4..8]));
        // Servers may emit section-sign color codes; keep going on odd bytes.
        let body = String::from_utf8_lossy(&payload[8..length - 2]).into_owned();

        Ok(Some(Packet { id, kind, body }))
    }
}

/// Writes RCON packets to an async writer.
pub struct PacketWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> PacketWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_packet(&mut self, packet: &Packet) -> Result<(), RconError> {
        if packet.body.len() > MAX_COMMAND_BYTES {
            return Err(RconError::PayloadTooLarge {
                len: packet.body.len(),
                max: MAX_COMMAND_BYTES,
            });
        }
        self.writer.write_all(&packet.encode()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), RconError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
