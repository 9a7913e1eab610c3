// SPDX-License-Identifier: MIT OR Apache-2.0

//! REJECT: `i32` reject reason bitmask. A server may OR multiple reasons
//! into one REJECT.

use crate::{
    codec::{
        flags::RejectReason,
        header::{self, Frame, HEADER_LEN, MessageHeader, MessageType},
    },
    databuf::DataBuf,
    error::FramingError,
};

pub const REJECT_LEN: usize = HEADER_LEN + 4;

pub struct RejectFrame;

impl Frame for RejectFrame {
    fn message_type() -> MessageType {
        MessageType::Reject
    }
    fn fixed_len() -> Option<usize> {
        Some(REJECT_LEN)
    }
}

pub fn write_reject(buf: &mut DataBuf, sender_id: i32, reason: RejectReason) -> usize {
    let mut pos = header::write_header(buf, MessageType::Reject, 0, sender_id);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, reason.bits());
    if pos == 0 {
        return 0;
    }
    header::end_frame(buf, pos)
}

pub fn is_reject(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<RejectFrame>(buf, received_len)
}

pub fn read_reject(
    buf: &DataBuf,
    received_len: usize,
) -> Result<(MessageHeader, RejectReason), FramingError> {
    let hdr = header::read_header(buf, MessageType::Reject, Some(REJECT_LEN), received_len)?;
    let raw = buf.peek_i32(HEADER_LEN).ok_or(FramingError::Truncated {
        needed: HEADER_LEN + 4,
        got: received_len,
    })?;
    Ok((hdr, RejectReason::from_bits_truncate(raw)))
}
