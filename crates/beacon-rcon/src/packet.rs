//! Source RCON packet framing.
//!
//! Every packet on the wire is:
//!
//! ```text
//! [length: i32 LE] [id: i32 LE] [type: i32 LE] [body bytes] [0x00] [0x00]
//! ```
//!
//! where `length` counts everything after itself. Authentication failure
//! is signaled by a response carrying id `-1`.

use crate::RconError;

/// Client → server: authenticate with the shared credential.
pub(crate) const TYPE_AUTH: i32 = 3;
/// Client → server: execute one command. Also the server's auth-response
/// type — the two directions reuse the value.
pub(crate) const TYPE_EXEC: i32 = 2;
/// Server → client: command response payload.
pub(crate) const TYPE_RESPONSE: i32 = 0;

/// Response id that marks a rejected credential.
pub(crate) const AUTH_FAILED_ID: i32 = -1;

/// id + type + two trailing NULs.
const HEADER_LEN: usize = 10;
/// Upper bound on a frame; responses larger than this are not framed by
/// the protocol as a single packet.
const MAX_FRAME_LEN: usize = 4106;

/// A single framed packet, either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Packet {
    pub(crate) id: i32,
    pub(crate) kind: i32,
    pub(crate) body: String,
}

impl Packet {
    pub(crate) fn new(id: i32, kind: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Serializes the packet, length prefix included.
    pub(crate) fn encode(&self) -> Vec<u8> {
        let body = self.body.as_bytes();
        let length = (HEADER_LEN + body.len()) as i32;

        let mut out = Vec::with_capacity(4 + HEADER_LEN + body.len());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.kind.to_le_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&[0, 0]);
        out
    }

    /// Parses a frame (the bytes after the length prefix) back into a
    /// packet.
    pub(crate) fn decode(frame: &[u8]) -> Result<Self, RconError> {
        if frame.len() < HEADER_LEN {
            return Err(RconError::MalformedPacket(format!(
                "frame too short: {} bytes",
                frame.len()
            )));
        }

        let id = i32::from_le_bytes(frame[0..4].try_into().unwrap());
        let kind = i32::from_le_bytes(frame[4..8].try_into().unwrap());

        let body_bytes = &frame[8..frame.len() - 2];
        let body = std::str::from_utf8(body_bytes)
            .map_err(|e| RconError::MalformedPacket(e.to_string()))?
            .to_string();

        Ok(Self { id, kind, body })
    }

    /// Validates a length prefix before allocating for the frame.
    pub(crate) fn frame_len(prefix: [u8; 4]) -> Result<usize, RconError> {
        let len = i32::from_le_bytes(prefix);
        let len = usize::try_from(len).map_err(|_| {
            RconError::MalformedPacket(format!("negative frame length {len}"))
        })?;
        if !(HEADER_LEN..=MAX_FRAME_LEN).contains(&len) {
            return Err(RconError::MalformedPacket(format!(
                "frame length {len} out of range"
            )));
        }
        Ok(len)
    }
}
