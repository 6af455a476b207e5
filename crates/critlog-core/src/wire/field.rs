//! Raw field values as read off the wire.

use super::WireType;
use std::fmt;

/// Number of payload bytes shown before a hex dump is cut short
const MAX_HEX_BYTES: usize = 32;

/// A decoded value, without any schema applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// VARINT value
    Varint(u64),
    /// I64 value, little endian
    Fixed64(u64),
    /// LEN payload
    Bytes(Vec<u8>),
    /// A group, consumed whole; its contents are not kept
    Group,
    /// I32 value, little endian
    Fixed32(u32),
}

impl RawValue {
    /// Number of payload bytes for LEN values, zero otherwise
    pub fn payload_len(&self) -> usize {
        match self {
            RawValue::Bytes(b) => b.len(),
            _ => 0,
        }
    }
}

/// A single field as read off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field number from the tag
    pub number: u32,
    /// Wire type from the tag
    pub wire_type: WireType,
    /// Decoded value
    pub value: RawValue,
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.number, self.wire_type.as_str())?;
        match &self.value {
            RawValue::Varint(v) | RawValue::Fixed64(v) => write!(f, " = {}", v),
            RawValue::Fixed32(v) => write!(f, " = {}", v),
            RawValue::Group => Ok(()),
            RawValue::Bytes(bytes) => match printable_str(bytes) {
                Some(s) => write!(f, " = {:?}", s),
                None => {
                    write!(f, "({}) = ", bytes.len())?;
                    for b in bytes.iter().take(MAX_HEX_BYTES) {
                        write!(f, "{:02x}", b)?;
                    }
                    if bytes.len() > MAX_HEX_BYTES {
                        write!(f, "...")?;
                    }
                    Ok(())
                }
            },
        }
    }
}

fn printable_str(bytes: &[u8]) -> Option<&str> {
    let s = std::str::from_utf8(bytes).ok()?;
    if s.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return None;
    }
    Some(s)
}
