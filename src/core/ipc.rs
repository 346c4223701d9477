//! # IPC Framing
//!
//! Turns captured zone segments into [`RawMessage`] values.
//!
//! A capture hook sees whole IPC segments. Server segments start with a
//! 16-byte header holding the message type and epoch; client segments carry
//! the message type in their first two bytes and the payload at `0x20`.

use crate::core::reader::WireReader;
use crate::error::{constants, NetworkError, Result};
use crate::protocol::opcode::Direction;

/// Size of the server->client IPC header preceding each payload
pub const SERVER_IPC_HEADER_SIZE: usize = 0x10;

/// Offset of the payload inside a client->server segment
pub const CLIENT_PAYLOAD_OFFSET: usize = 0x20;

/// One captured message, borrowed for the duration of a single decode call
#[derive(Debug, Clone, Copy)]
pub struct RawMessage<'a> {
    pub direction: Direction,
    pub opcode: u16,
    pub payload: &'a [u8],
    pub source_actor_id: u32,
    pub target_actor_id: u32,
    /// Server epoch from the IPC header, when the segment carried one
    pub epoch: Option<u32>,
}

impl<'a> RawMessage<'a> {
    /// Server->client message addressed to `target_actor_id`
    pub fn server(opcode: u16, payload: &'a [u8], target_actor_id: u32) -> Self {
        Self {
            direction: Direction::ServerToClient,
            opcode,
            payload,
            source_actor_id: 0,
            target_actor_id,
            epoch: None,
        }
    }

    /// Client->server message
    pub fn client(opcode: u16, payload: &'a [u8]) -> Self {
        Self {
            direction: Direction::ClientToServer,
            opcode,
            payload,
            source_actor_id: 0,
            target_actor_id: 0,
            epoch: None,
        }
    }

    /// Frame a server segment that still carries its IPC header
    pub fn from_server_segment(segment: &'a [u8], target_actor_id: u32) -> Result<Self> {
        let header = ServerIpcHeader::parse(segment)?;
        Ok(Self {
            direction: Direction::ServerToClient,
            opcode: header.message_type,
            payload: &segment[SERVER_IPC_HEADER_SIZE..],
            source_actor_id: 0,
            target_actor_id,
            epoch: Some(header.epoch),
        })
    }

    /// Frame a client segment; the opcode is its first `u16`
    pub fn from_client_segment(segment: &'a [u8]) -> Result<Self> {
        if segment.len() < CLIENT_PAYLOAD_OFFSET {
            return Err(NetworkError::InvalidSegment(format!(
                "{}: {} bytes",
                constants::ERR_CLIENT_SEGMENT_TOO_SHORT,
                segment.len()
            )));
        }
        let opcode = u16::from_le_bytes([segment[0], segment[1]]);
        Ok(Self::client(opcode, &segment[CLIENT_PAYLOAD_OFFSET..]))
    }
}

/// Header preceding every server->client payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerIpcHeader {
    pub reserved: u16,
    pub message_type: u16,
    pub unknown: u16,
    pub server_id: u16,
    pub epoch: u32,
    pub unknown2: u32,
}

impl ServerIpcHeader {
    pub fn parse(segment: &[u8]) -> Result<Self> {
        let r = WireReader::new(segment, "ServerIpcHeader", SERVER_IPC_HEADER_SIZE).map_err(
            |_| {
                NetworkError::InvalidSegment(format!(
                    "{}: {} bytes",
                    constants::ERR_SERVER_SEGMENT_TOO_SHORT,
                    segment.len()
                ))
            },
        )?;
        Ok(Self {
            reserved: r.u16_at(0x00),
            message_type: r.u16_at(0x02),
            unknown: r.u16_at(0x04),
            server_id: r.u16_at(0x06),
            epoch: r.u32_at(0x08),
            unknown2: r.u32_at(0x0C),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_segment_splits_header_and_payload() {
        let mut segment = vec![0u8; SERVER_IPC_HEADER_SIZE + 4];
        segment[0x02..0x04].copy_from_slice(&0x0254u16.to_le_bytes());
        segment[0x06..0x08].copy_from_slice(&3u16.to_le_bytes());
        segment[0x08..0x0C].copy_from_slice(&77u32.to_le_bytes());
        segment[0x10..].copy_from_slice(&[9, 8, 7, 6]);

        let msg = RawMessage::from_server_segment(&segment, 0x1000_0001).unwrap();
        assert_eq!(msg.direction, Direction::ServerToClient);
        assert_eq!(msg.opcode, 0x0254);
        assert_eq!(msg.payload, &[9, 8, 7, 6]);
        assert_eq!(msg.target_actor_id, 0x1000_0001);
        assert_eq!(msg.epoch, Some(77));
    }

    #[test]
    fn client_segment_reads_opcode_from_front() {
        let mut segment = vec![0u8; CLIENT_PAYLOAD_OFFSET + 2];
        segment[0..2].copy_from_slice(&0x02DCu16.to_le_bytes());
        segment[CLIENT_PAYLOAD_OFFSET] = 0x55;

        let msg = RawMessage::from_client_segment(&segment).unwrap();
        assert_eq!(msg.direction, Direction::ClientToServer);
        assert_eq!(msg.opcode, 0x02DC);
        assert_eq!(msg.payload[0], 0x55);
        assert_eq!(msg.epoch, None);
    }

    #[test]
    fn short_segments_are_rejected() {
        assert!(matches!(
            RawMessage::from_server_segment(&[0u8; 6], 0),
            Err(NetworkError::InvalidSegment(_))
        ));
        assert!(matches!(
            RawMessage::from_client_segment(&[0u8; 6]),
            Err(NetworkError::InvalidSegment(_))
        ));
    }
}
