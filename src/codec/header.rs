// SPDX-License-Identifier: MIT OR Apache-2.0

//! The 16-byte message header shared by every wire message, and the
//! two-pass writer/reader pair used to frame variable-length bodies.

use crate::{clock, databuf::DataBuf, error::FramingError};

/// Size in bytes of the fixed message header.
pub const HEADER_LEN: usize = 16;

/// Sender id meaning "unassigned" — used in REQUEST before a client has
/// been given an id by ACCEPT.
pub const SENDER_UNASSIGNED: i32 = -1;

/// Sender id of the server peer.
pub const SENDER_SERVER: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Request = 1,
    Accept = 2,
    Reject = 3,
    Data = 4,
    Stop = 5,
    Pause = 6,
    Resume = 7,
}

impl MessageType {
    pub fn from_i16(v: i16) -> Option<Self> {
        Some(match v {
            1 => Self::Request,
            2 => Self::Accept,
            3 => Self::Reject,
            4 => Self::Data,
            5 => Self::Stop,
            6 => Self::Pause,
            7 => Self::Resume,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Decoded view of the 16-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_type: MessageType,
    pub total_length: usize,
    pub sender_id: i32,
    pub timestamp_ms: i64,
}

/// A message type that knows its own wire discriminant and, for
/// fixed-length types, the exact length a well-formed datagram must have.
/// Generalizes the per-message `is_<msg>` recognizer so the check isn't
/// hand-duplicated in every module.
pub trait Frame {
    fn message_type() -> MessageType;

    /// `Some(n)` for fixed-length messages (the whole datagram must be
    /// exactly `n` bytes); `None` for variable-length messages (REQUEST,
    /// DATA), whose length is only known after the body is written.
    fn fixed_len() -> Option<usize> {
        None
    }
}

/// Resets `buf` and writes the 16-byte header with the current epoch-ms
/// timestamp. `length` may be `0` and back-patched later via
/// [`DataBuf::set_i16`] at offset 2 once the body size is known.
pub fn write_header(
    buf: &mut DataBuf,
    message_type: MessageType,
    length: i16,
    sender_id: i32,
) -> usize {
    buf.reset();
    let mut pos = 0;
    pos = buf.write_i16(pos, message_type.as_i16());
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i16(pos, length);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i32(pos, sender_id);
    if pos == 0 {
        return 0;
    }
    pos = buf.write_i64(pos, clock::epoch_ms());
    if pos == 0 {
        return 0;
    }
    debug_assert_eq!(pos, HEADER_LEN);
    pos
}

/// Reads and validates the header against `expected_type`; if
/// `expected_len` is `Some`, the header's length field must match it
/// exactly (fixed-length messages). Returns the position just past the
/// header together with the decoded fields, or a [`FramingError`].
///
/// `received_len` is the number of bytes actually present in the
/// datagram, checked against the header's own length field: the declared
/// length must equal the bytes actually received, or the datagram is
/// rejected as malformed rather than trusted.
pub fn read_header(
    buf: &DataBuf,
    expected_type: MessageType,
    expected_len: Option<usize>,
    received_len: usize,
) -> Result<MessageHeader, FramingError> {
    if received_len < HEADER_LEN {
        return Err(FramingError::Truncated { needed: HEADER_LEN, got: received_len });
    }

    let raw_type =
        buf.peek_i16(0).ok_or(FramingError::Truncated { needed: 2, got: received_len })?;
    let message_type =
        MessageType::from_i16(raw_type).ok_or(FramingError::UnknownType(raw_type))?;
    if message_type != expected_type {
        return Err(FramingError::UnknownType(raw_type));
    }

    let declared_len = buf
        .peek_i16(2)
        .ok_or(FramingError::Truncated { needed: 4, got: received_len })?
        as usize;
    if declared_len != received_len {
        return Err(FramingError::LengthMismatch {
            declared: declared_len,
            actual: received_len,
        });
    }
    if let Some(expected) = expected_len
        && declared_len != expected
    {
        return Err(FramingError::LengthMismatch { declared: declared_len, actual: expected });
    }

    let sender_id = buf
        .peek_i32(4)
        .ok_or(FramingError::Truncated { needed: 8, got: received_len })?;
    let timestamp_ms = buf
        .peek_i64(8)
        .ok_or(FramingError::Truncated { needed: 16, got: received_len })?;

    Ok(MessageHeader {
        message_type,
        total_length: declared_len,
        sender_id,
        timestamp_ms,
    })
}

/// Checks the wire discriminant (and, for fixed-length frames, the
/// declared length) without fully decoding the header, generalized over
/// [`Frame`] so every message type gets an `is_<msg>` recognizer for free.
pub fn is_message<T: Frame>(buf: &DataBuf, received_len: usize) -> bool {
    let Some(raw_type) = buf.peek_i16(0) else { return false };
    if MessageType::from_i16(raw_type) != Some(T::message_type()) {
        return false;
    }
    match T::fixed_len() {
        Some(expected) => buf.peek_i16(2).is_some_and(|l| l as usize == expected)
            && received_len == expected,
        None => true,
    }
}

/// Back-patches the total length field (header offset 2) once a
/// variable-length body has been written up to `end_pos`.
pub fn end_frame(buf: &mut DataBuf, end_pos: usize) -> usize {
    buf.set_i16(2, end_pos as i16)
}
