// SPDX-License-Identifier: MIT OR Apache-2.0

//! STOP / PAUSE / RESUME: header only, no body.

use crate::{
    codec::header::{self, Frame, HEADER_LEN, MessageHeader, MessageType},
    databuf::DataBuf,
    error::FramingError,
};

pub struct StopFrame;
impl Frame for StopFrame {
    fn message_type() -> MessageType {
        MessageType::Stop
    }
    fn fixed_len() -> Option<usize> {
        Some(HEADER_LEN)
    }
}

pub struct PauseFrame;
impl Frame for PauseFrame {
    fn message_type() -> MessageType {
        MessageType::Pause
    }
    fn fixed_len() -> Option<usize> {
        Some(HEADER_LEN)
    }
}

pub struct ResumeFrame;
impl Frame for ResumeFrame {
    fn message_type() -> MessageType {
        MessageType::Resume
    }
    fn fixed_len() -> Option<usize> {
        Some(HEADER_LEN)
    }
}

/// Writes a header-only message (STOP/PAUSE/RESUME).
pub fn write_simple(buf: &mut DataBuf, message_type: MessageType, sender_id: i32) -> usize {
    header::write_header(buf, message_type, HEADER_LEN as i16, sender_id)
}

pub fn is_stop(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<StopFrame>(buf, received_len)
}

pub fn is_pause(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<PauseFrame>(buf, received_len)
}

pub fn is_resume(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<ResumeFrame>(buf, received_len)
}

pub fn read_simple(
    buf: &DataBuf,
    message_type: MessageType,
    received_len: usize,
) -> Result<MessageHeader, FramingError> {
    header::read_header(buf, message_type, Some(HEADER_LEN), received_len)
}
