//! Low-level protobuf wire format scanning.
//!
//! The typed decoder drops fields it has no schema for. This module walks the
//! raw bytes instead, so that records carrying an unset or newer event kind
//! can still be shown field by field.
//!
//! ## Wire Format Overview
//!
//! Each protobuf field is encoded as:
//! - A varint "tag" containing the field number and wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (int32, int64, uint32, uint64, sint32, sint64, bool, enum)
//! - 1: I64 (fixed64, sfixed64, double)
//! - 2: LEN (string, bytes, embedded messages, packed repeated fields)
//! - 5: I32 (fixed32, sfixed32, float)

mod field;

use crate::error::{Error, Result};

pub use field::{RawField, RawValue};

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length integer
    Varint = 0,
    /// 64-bit fixed-width
    I64 = 1,
    /// Length-delimited (strings, bytes, embedded messages)
    Len = 2,
    /// Start group (deprecated)
    StartGroup = 3,
    /// End group (deprecated)
    EndGroup = 4,
    /// 32-bit fixed-width
    I32 = 5,
}

impl WireType {
    /// Short lowercase name used in raw dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::I64 => "i64",
            WireType::Len => "len",
            WireType::StartGroup => "sgroup",
            WireType::EndGroup => "egroup",
            WireType::I32 => "i32",
        }
    }
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::I32),
            _ => Err(Error::invalid_wire_format(
                0,
                format!("unknown wire type: {}", value),
            )),
        }
    }
}

/// Maximum valid protobuf field number (2^29 - 1)
pub const MAX_VALID_NUMBER: u32 = 536_870_911;

/// Deepest group nesting accepted, same as prost's default recursion limit
const RECURSION_LIMIT: u32 = 100;

/// Decode a varint from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i >= 10 {
            // Varints are at most 10 bytes for a 64-bit value
            return Err(Error::varint_decode(i));
        }

        result |= ((byte & 0x7F) as u64) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(Error::varint_decode(data.len()))
}

/// Read a single field from the start of `data`.
///
/// Returns the field and the total bytes consumed (tag and value). A group is
/// consumed whole, up to and including its matching end tag. Offsets in
/// errors are relative to `data`.
pub fn read_field(data: &[u8]) -> Result<(RawField, usize)> {
    let (field, len) = read_tagged(data, 0)?;
    if field.wire_type == WireType::EndGroup {
        return Err(Error::invalid_wire_format(
            0,
            format!("unexpected end group tag for field {}", field.number),
        ));
    }
    Ok((field, len))
}

/// Like [`read_field`], but hands back a lone end group tag to the caller
fn read_tagged(data: &[u8], depth: u32) -> Result<(RawField, usize)> {
    if data.is_empty() {
        return Err(Error::invalid_wire_format(0, "empty data"));
    }

    let (tag, tag_len) = decode_varint(data)
        .map_err(|_| Error::invalid_wire_format(0, "failed to decode field tag"))?;

    let wire_type = WireType::try_from((tag & 0x07) as u8)?;
    let number = tag >> 3;

    if number == 0 || number > MAX_VALID_NUMBER as u64 {
        return Err(Error::InvalidFieldNumber {
            number,
            max: MAX_VALID_NUMBER,
        });
    }

    let rest = &data[tag_len..];
    let (value, value_len) = match wire_type {
        WireType::Varint => {
            let (v, len) = decode_varint(rest).map_err(|_| {
                Error::invalid_wire_format(tag_len, "failed to decode varint value")
            })?;
            (RawValue::Varint(v), len)
        }
        WireType::I64 => {
            let bytes: [u8; 8] = rest
                .get(..8)
                .and_then(|b| b.try_into().ok())
                .ok_or_else(|| Error::invalid_wire_format(tag_len, "not enough bytes for I64"))?;
            (RawValue::Fixed64(u64::from_le_bytes(bytes)), 8)
        }
        WireType::Len => {
            let (length, length_len) = decode_varint(rest).map_err(|_| {
                Error::invalid_wire_format(tag_len, "failed to decode length prefix")
            })?;
            let available = rest.len() - length_len;
            let length = usize::try_from(length)
                .ok()
                .filter(|&l| l <= available)
                .ok_or_else(|| {
                    Error::invalid_wire_format(
                        tag_len,
                        format!(
                            "not enough bytes for LEN field (need {}, have {})",
                            length, available
                        ),
                    )
                })?;
            let payload = rest[length_len..length_len + length].to_vec();
            (RawValue::Bytes(payload), length_len + length)
        }
        WireType::StartGroup => {
            let len = skip_group(rest, number, depth + 1)
                .map_err(|e| shift_offset(e, tag_len))?;
            (RawValue::Group, len)
        }
        WireType::EndGroup => (RawValue::Group, 0),
        WireType::I32 => {
            let bytes: [u8; 4] = rest
                .get(..4)
                .and_then(|b| b.try_into().ok())
                .ok_or_else(|| Error::invalid_wire_format(tag_len, "not enough bytes for I32"))?;
            (RawValue::Fixed32(u32::from_le_bytes(bytes)), 4)
        }
    };

    let field = RawField {
        number: number as u32,
        wire_type,
        value,
    };
    Ok((field, tag_len + value_len))
}

/// Consume the body of a group numbered `number`, including its end tag.
///
/// Returns the bytes consumed.
fn skip_group(data: &[u8], number: u64, depth: u32) -> Result<usize> {
    if depth > RECURSION_LIMIT {
        return Err(Error::invalid_wire_format(0, "group nesting too deep"));
    }

    let mut position = 0;
    loop {
        if position >= data.len() {
            return Err(Error::invalid_wire_format(
                position,
                format!("unterminated group for field {}", number),
            ));
        }
        let (field, len) =
            read_tagged(&data[position..], depth).map_err(|e| shift_offset(e, position))?;
        if field.wire_type == WireType::EndGroup {
            if u64::from(field.number) != number {
                return Err(Error::invalid_wire_format(
                    position,
                    format!(
                        "end group tag for field {} closes group {}",
                        field.number, number
                    ),
                ));
            }
            return Ok(position + len);
        }
        position += len;
    }
}

/// Read every field in `data`.
///
/// Unlike a best-effort scan this fails on the first malformed field, with
/// the offset adjusted to the start of `data`.
pub fn parse_fields(data: &[u8]) -> Result<Vec<RawField>> {
    let mut fields = Vec::new();
    let mut position = 0;

    while position < data.len() {
        let (field, len) = read_field(&data[position..]).map_err(|e| shift_offset(e, position))?;
        fields.push(field);
        position += len;
    }

    Ok(fields)
}

/// Collect the payloads of all LEN fields numbered `number`, in order.
///
/// Other fields are skipped but must still be well formed.
pub fn length_delimited(data: &[u8], number: u32) -> Result<Vec<&[u8]>> {
    let mut payloads = Vec::new();
    let mut position = 0;

    while position < data.len() {
        let (field, len) = read_field(&data[position..]).map_err(|e| shift_offset(e, position))?;
        if field.number == number && field.wire_type == WireType::Len {
            // Payload is the tail of the consumed span.
            let payload_len = field.value.payload_len();
            let end = position + len;
            payloads.push(&data[end - payload_len..end]);
        }
        position += len;
    }

    Ok(payloads)
}

fn shift_offset(err: Error, base: usize) -> Error {
    match err {
        Error::InvalidWireFormat { offset, details } => {
            Error::invalid_wire_format(base + offset, details)
        }
        Error::VarintDecode { offset } => Error::varint_decode(base + offset),
        other => other,
    }
}
