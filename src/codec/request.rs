// SPDX-License-Identifier: MIT OR Apache-2.0

//! REQUEST: `i32` capability flags, length-prefixed schema string, `i64`
//! requested simulation epoch-ms, `i32` preferred update interval (ms).

use crate::{
    codec::{
        flags::CapabilityFlags,
        header::{self, Frame, HEADER_LEN, MessageHeader, MessageType},
    },
    databuf::DataBuf,
    error::FramingError,
};

pub struct RequestFrame;

impl Frame for RequestFrame {
    fn message_type() -> MessageType {
        MessageType::Request
    }
    // variable length: schema string
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub flags: CapabilityFlags,
    pub schema: String,
    pub requested_sim_ms: i64,
    pub preferred_interval_ms: i32,
}

/// Writes a full REQUEST datagram (header + body) and back-patches the
/// length. `sender_id` is [`header::SENDER_UNASSIGNED`] before a client has
/// been given an id.
pub fn write_request(
    buf: &mut DataBuf,
    sender_id: i32,
    body: &RequestBody,
) -> usize {
    let mut pos = header::write_header(buf, MessageType::Request, 0, sender_id);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, body.flags.bits());
    if pos == 0 {
        return 0;
    }
    pos = buf.write_string(pos, &body.schema);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i64(pos, body.requested_sim_ms);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, body.preferred_interval_ms);
    if pos == 0 {
        return 0;
    }
    header::end_frame(buf, pos)
}

pub fn is_request(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<RequestFrame>(buf, received_len)
}

pub fn read_request(
    buf: &mut DataBuf,
    received_len: usize,
) -> Result<(MessageHeader, RequestBody), FramingError> {
    let hdr = header::read_header(buf, MessageType::Request, None, received_len)?;

    let mut pos = HEADER_LEN;
    let flags = buf
        .read_i32(pos)
        .ok_or(FramingError::Truncated { needed: pos + 4, got: received_len })?;
    pos += 4;
    let schema = buf
        .read_strdup(pos)
        .ok_or(FramingError::Truncated { needed: pos + 2, got: received_len })?;
    pos = buf.position();
    let requested_sim_ms = buf
        .read_i64(pos)
        .ok_or(FramingError::Truncated { needed: pos + 8, got: received_len })?;
    pos += 8;
    let preferred_interval_ms = buf
        .read_i32(pos)
        .ok_or(FramingError::Truncated { needed: pos + 4, got: received_len })?;

    Ok((
        hdr,
        RequestBody {
            flags: CapabilityFlags::from_bits_truncate(flags),
            schema,
            requested_sim_ms,
            preferred_interval_ms,
        },
    ))
}
