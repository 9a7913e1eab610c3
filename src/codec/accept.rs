// SPDX-License-Identifier: MIT OR Apache-2.0

//! ACCEPT: `i32` server flags, `i64` server simulation epoch-ms, `i32`
//! chosen update interval (ms), `i32` assigned client id.
//!
//! Fixed length `HEADER_LEN + 20`, carrying the negotiated `sim_ms` field
//! alongside the chosen interval and assigned client id. There is no
//! shorter legacy layout here — every ACCEPT on the wire uses this one.

use crate::{
    codec::{
        flags::CapabilityFlags,
        header::{self, Frame, HEADER_LEN, MessageHeader, MessageType},
    },
    databuf::DataBuf,
    error::FramingError,
};

pub const ACCEPT_LEN: usize = HEADER_LEN + 20;

pub struct AcceptFrame;

impl Frame for AcceptFrame {
    fn message_type() -> MessageType {
        MessageType::Accept
    }
    fn fixed_len() -> Option<usize> {
        Some(ACCEPT_LEN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptBody {
    pub flags: CapabilityFlags,
    pub server_sim_ms: i64,
    pub chosen_interval_ms: i32,
    pub assigned_client_id: i32,
}

pub fn write_accept(buf: &mut DataBuf, sender_id: i32, body: &AcceptBody) -> usize {
    let mut pos = header::write_header(buf, MessageType::Accept, 0, sender_id);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, body.flags.bits());
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i64(pos, body.server_sim_ms);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, body.chosen_interval_ms);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, body.assigned_client_id);
    if pos == 0 {
        return 0;
    }
    header::end_frame(buf, pos)
}

pub fn is_accept(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<AcceptFrame>(buf, received_len)
}

pub fn read_accept(
    buf: &DataBuf,
    received_len: usize,
) -> Result<(MessageHeader, AcceptBody), FramingError> {
    let hdr = header::read_header(buf, MessageType::Accept, Some(ACCEPT_LEN), received_len)?;

    let flags = buf.peek_i32(HEADER_LEN).ok_or(FramingError::Truncated {
        needed: HEADER_LEN + 4,
        got: received_len,
    })?;
    let server_sim_ms =
        buf.peek_i64(HEADER_LEN + 4).ok_or(FramingError::Truncated {
            needed: HEADER_LEN + 12,
            got: received_len,
        })?;
    let chosen_interval_ms =
        buf.peek_i32(HEADER_LEN + 12).ok_or(FramingError::Truncated {
            needed: HEADER_LEN + 16,
            got: received_len,
        })?;
    let assigned_client_id =
        buf.peek_i32(HEADER_LEN + 16).ok_or(FramingError::Truncated {
            needed: HEADER_LEN + 20,
            got: received_len,
        })?;

    Ok((
        hdr,
        AcceptBody {
            flags: CapabilityFlags::from_bits_truncate(flags),
            server_sim_ms,
            chosen_interval_ms,
            assigned_client_id,
        },
    ))
}
