//! Record encoding and decoding.
//!
//! Record format (FlatBuffers table, little-endian):
//! - ROOT (u32): offset of the table from the start of the buffer
//! - TABLE: i32 back-offset to its vtable, then one u32 per present field
//! - VTABLE: u16 vtable size, u16 table size, u16 field offset per slot
//! - STRING: u32 byte length, UTF-8 bytes, NUL terminator
//!
//! Slot 4 holds `app`, slot 6 holds `payload`.

use core::str;

use crate::message::Message;

/// Size of the receive buffer; also the upper bound of an encoded record
pub const FRAME_CAPACITY: usize = 1056;

/// Smallest span that can hold a root offset, a vtable header and a table
pub const MIN_RECORD_LEN: usize = 12;

/// Longest `app` the encoder emits, in bytes
pub const MAX_APP_LEN: usize = 32;

/// Longest `payload` the encoder emits, in bytes
///
/// Chosen so that a record with a full-length app still fits
/// [`FRAME_CAPACITY`].
pub const MAX_PAYLOAD_LEN: usize = 984;

/// Vtable slot of the `app` field
pub const VT_APP: u16 = 4;

/// Vtable slot of the `payload` field
pub const VT_PAYLOAD: u16 = 6;

/// Fixed prefix written by [`encode`]: root, vtable and table
const ENCODED_HEADER_LEN: usize = 24;

/// Errors that can occur while decoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Span is shorter than [`MIN_RECORD_LEN`]
    TooShort,
    /// Root offset points outside the span
    RootOutOfBounds,
    /// Table, vtable or string is not aligned to its scalar size
    Misaligned,
    /// Vtable offset points outside the span
    VTableOutOfBounds,
    /// Vtable or table size is inconsistent with the span
    BadVTable,
    /// Field offset points past the end of its table
    FieldOutOfBounds,
    /// String offset or length points outside the span
    StringOutOfBounds,
    /// String is not followed by a NUL byte
    MissingTerminator,
    /// String bytes are not valid UTF-8
    InvalidUtf8,
    /// Record has no `app` field
    MissingApp,
}

/// Errors that can occur while encoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer cannot hold the record
    BufferTooSmall,
}

fn read_u16(buf: &[u8], pos: usize) -> Option<u16> {
    let bytes = buf.get(pos..pos.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(buf: &[u8], pos: usize) -> Option<u32> {
    let bytes = buf.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_i32(buf: &[u8], pos: usize) -> Option<i32> {
    read_u32(buf, pos).map(|v| v as i32)
}

/// A table whose header has been checked against the buffer
struct Table<'a> {
    buf: &'a [u8],
    table: usize,
    vtable: usize,
    vtable_len: usize,
    table_len: usize,
}

impl<'a> Table<'a> {
    fn root(buf: &'a [u8]) -> Result<Self, DecodeError> {
        if buf.len() < MIN_RECORD_LEN {
            return Err(DecodeError::TooShort);
        }

        let table = read_u32(buf, 0).ok_or(DecodeError::TooShort)? as usize;
        if table % 4 != 0 {
            return Err(DecodeError::Misaligned);
        }
        let soffset = read_i32(buf, table).ok_or(DecodeError::RootOutOfBounds)?;

        let vtable = table as i64 - i64::from(soffset);
        if vtable < 0 || vtable as u64 + 4 > buf.len() as u64 {
            return Err(DecodeError::VTableOutOfBounds);
        }
        let vtable = vtable as usize;
        if vtable % 2 != 0 {
            return Err(DecodeError::Misaligned);
        }

        let vtable_len = read_u16(buf, vtable).ok_or(DecodeError::VTableOutOfBounds)? as usize;
        let table_len = read_u16(buf, vtable + 2).ok_or(DecodeError::VTableOutOfBounds)? as usize;

        if vtable_len < 4 || vtable_len % 2 != 0 || vtable + vtable_len > buf.len() {
            return Err(DecodeError::BadVTable);
        }
        if table_len < 4 || table + table_len > buf.len() {
            return Err(DecodeError::BadVTable);
        }

        Ok(Self {
            buf,
            table,
            vtable,
            vtable_len,
            table_len,
        })
    }

    /// Absolute position of a field, or `None` when the slot is absent
    fn field(&self, slot: u16) -> Result<Option<usize>, DecodeError> {
        let slot = slot as usize;
        if slot + 2 > self.vtable_len {
            return Ok(None);
        }

        let offset = read_u16(self.buf, self.vtable + slot).ok_or(DecodeError::BadVTable)? as usize;
        if offset == 0 {
            return Ok(None);
        }
        // Field must lie inside the table, after the vtable back-offset
        if offset < 4 || offset + 4 > self.table_len {
            return Err(DecodeError::FieldOutOfBounds);
        }

        Ok(Some(self.table + offset))
    }

    fn string(&self, slot: u16) -> Result<Option<&'a str>, DecodeError> {
        let Some(field) = self.field(slot)? else {
            return Ok(None);
        };
        if field % 4 != 0 {
            return Err(DecodeError::Misaligned);
        }

        let relative = read_u32(self.buf, field).ok_or(DecodeError::FieldOutOfBounds)? as usize;
        let start = field
            .checked_add(relative)
            .ok_or(DecodeError::StringOutOfBounds)?;
        if start % 4 != 0 {
            return Err(DecodeError::Misaligned);
        }

        let len = read_u32(self.buf, start).ok_or(DecodeError::StringOutOfBounds)? as usize;
        let body = start + 4;
        let end = body
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(DecodeError::StringOutOfBounds)?;

        match self.buf.get(end) {
            Some(0) => {}
            _ => return Err(DecodeError::MissingTerminator),
        }

        str::from_utf8(&self.buf[body..end])
            .map(Some)
            .map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Decode one record from the start of `buf`
///
/// Bytes after the record are ignored. The returned message borrows its
/// strings from `buf`.
pub fn decode(buf: &[u8]) -> Result<Message<'_>, DecodeError> {
    let table = Table::root(buf)?;

    let app = table.string(VT_APP)?.ok_or(DecodeError::MissingApp)?;
    let payload = table.string(VT_PAYLOAD)?.unwrap_or("");

    Ok(Message::new(app, payload))
}

/// Cut `text` to at most `max` bytes without splitting a character
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Bytes a string occupies in a record: length, body, NUL, padding
const fn string_block_len(len: usize) -> usize {
    (4 + len + 1 + 3) & !3
}

fn write_string(buf: &mut [u8], pos: usize, text: &str) -> usize {
    let block = string_block_len(text.len());
    buf[pos..pos + 4].copy_from_slice(&(text.len() as u32).to_le_bytes());
    buf[pos + 4..pos + 4 + text.len()].copy_from_slice(text.as_bytes());
    buf[pos + 4 + text.len()..pos + block].fill(0);
    block
}

/// Encode a record into `buf`
///
/// `app` is cut to [`MAX_APP_LEN`] bytes and `payload` to
/// [`MAX_PAYLOAD_LEN`] bytes on character boundaries, so the record never
/// exceeds [`FRAME_CAPACITY`].
///
/// Returns the number of bytes written.
pub fn encode(app: &str, payload: &str, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let app = truncate(app, MAX_APP_LEN);
    let payload = truncate(payload, MAX_PAYLOAD_LEN);

    let app_pos = ENCODED_HEADER_LEN;
    let payload_pos = app_pos + string_block_len(app.len());
    let total = payload_pos + string_block_len(payload.len());
    if buf.len() < total {
        return Err(EncodeError::BufferTooSmall);
    }

    const VTABLE_POS: usize = 4;
    const TABLE_POS: usize = 12;
    const APP_FIELD: usize = TABLE_POS + 4;
    const PAYLOAD_FIELD: usize = TABLE_POS + 8;

    // Root offset
    buf[0..4].copy_from_slice(&(TABLE_POS as u32).to_le_bytes());

    // Vtable: its own size, table size, slot offsets
    buf[4..6].copy_from_slice(&8u16.to_le_bytes());
    buf[6..8].copy_from_slice(&12u16.to_le_bytes());
    buf[8..10].copy_from_slice(&4u16.to_le_bytes());
    buf[10..12].copy_from_slice(&8u16.to_le_bytes());

    // Table
    buf[12..16].copy_from_slice(&((TABLE_POS - VTABLE_POS) as i32).to_le_bytes());
    buf[16..20].copy_from_slice(&((app_pos - APP_FIELD) as u32).to_le_bytes());
    buf[20..24].copy_from_slice(&((payload_pos - PAYLOAD_FIELD) as u32).to_le_bytes());

    write_string(buf, app_pos, app);
    write_string(buf, payload_pos, payload);

    Ok(total)
}
