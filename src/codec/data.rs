// SPDX-License-Identifier: MIT OR Apache-2.0

//! DATA framing: header plus an opaque application payload region. The
//! payload's layout is entirely the application's responsibility via the
//! `write_data`/`read_data` context callbacks — this module only frames
//! the region and back-patches its length.

use crate::{
    codec::header::{self, Frame, HEADER_LEN, MessageHeader, MessageType},
    databuf::DataBuf,
    error::FramingError,
};

pub struct DataFrame;
impl Frame for DataFrame {
    fn message_type() -> MessageType {
        MessageType::Data
    }
    // variable length: opaque payload
}

/// Writes the DATA header with length 0 and returns the position where
/// the application's `write_data` callback should start filling the
/// payload. Call [`end_write_data`] with the callback's returned position
/// to back-patch the final length.
pub fn begin_write_data(buf: &mut DataBuf, sender_id: i32) -> usize {
    header::write_header(buf, MessageType::Data, 0, sender_id)
}

/// Back-patches the total length once the payload has been written up to
/// `end_pos`. Returns `0` (and leaves the header length at its placeholder
/// value) if `end_pos` doesn't fit in the length field.
pub fn end_write_data(buf: &mut DataBuf, end_pos: usize) -> usize {
    header::end_frame(buf, end_pos)
}

pub fn is_data(buf: &DataBuf, received_len: usize) -> bool {
    header::is_message::<DataFrame>(buf, received_len)
}

/// Validates the header and returns it together with the position where
/// the payload begins; the application reads the payload via its
/// `read_data` callback from there.
pub fn read_data_header(
    buf: &DataBuf,
    received_len: usize,
) -> Result<(MessageHeader, usize), FramingError> {
    let hdr = header::read_header(buf, MessageType::Data, None, received_len)?;
    Ok((hdr, HEADER_LEN))
}
