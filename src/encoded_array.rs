//! `encoded_array_item` decoding, used for static field initializers.
//!
//! Two size rules are available. `Heuristic` is the droidcolors rule: every
//! value is a tag byte plus `value_arg + 1` payload bytes. It is wrong for
//! nested arrays, annotations, `null` and booleans, but it reproduces the
//! region boundaries of the original tool. `Strict` follows the full
//! `value_type` table.

use crate::cursor::Cursor;
use crate::error::{DexError, Result};
use crate::region::{Category, Region};

/// Arrays and annotations may nest; deeper input is rejected.
pub const MAX_NESTING: usize = 32;

const VALUE_BYTE: u8 = 0x00;
const VALUE_SHORT: u8 = 0x02;
const VALUE_CHAR: u8 = 0x03;
const VALUE_INT: u8 = 0x04;
const VALUE_LONG: u8 = 0x06;
const VALUE_FLOAT: u8 = 0x10;
const VALUE_DOUBLE: u8 = 0x11;
const VALUE_METHOD_TYPE: u8 = 0x15;
const VALUE_ENUM: u8 = 0x1b;
const VALUE_ARRAY: u8 = 0x1c;
const VALUE_ANNOTATION: u8 = 0x1d;
const VALUE_NULL: u8 = 0x1e;
const VALUE_BOOLEAN: u8 = 0x1f;

/// How encoded values are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueDecoding {
    #[default]
    Heuristic,
    Strict,
}

/// Decodes the encoded array at `offset` and returns the span it occupies.
pub fn decode_encoded_array(data: &[u8], offset: u32, mode: ValueDecoding) -> Result<Region> {
    let mut cursor = Cursor::at(data, offset)?;
    match mode {
        ValueDecoding::Heuristic => skip_array_heuristic(&mut cursor)?,
        ValueDecoding::Strict => skip_array(&mut cursor, 0)?,
    }
    Ok(Region::new(
        u64::from(offset),
        cursor.consumed() as u64,
        Category::StaticValues,
    ))
}

fn skip_array_heuristic(cursor: &mut Cursor<'_>) -> Result<()> {
    let size = cursor.read_uleb128()?;
    for _ in 0..size {
        // (value_arg << 5) | value_type
        let tag = cursor.read_u8()?;
        let value_arg = tag >> 5;
        cursor.skip(u64::from(value_arg & 0x7) + 1)?;
    }
    Ok(())
}

fn skip_array(cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
    let size = cursor.read_uleb128()?;
    for _ in 0..size {
        skip_value(cursor, depth)?;
    }
    Ok(())
}

fn skip_annotation(cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
    cursor.read_uleb128()?; // type_idx
    let size = cursor.read_uleb128()?;
    for _ in 0..size {
        cursor.read_uleb128()?; // name_idx
        skip_value(cursor, depth)?;
    }
    Ok(())
}

fn skip_value(cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
    let offset = cursor.position();
    let tag = cursor.read_u8()?;
    let value_type = tag & 0x1f;
    let value_arg = tag >> 5;
    match value_type {
        VALUE_BYTE | VALUE_SHORT | VALUE_CHAR | VALUE_INT | VALUE_LONG | VALUE_FLOAT
        | VALUE_DOUBLE | VALUE_METHOD_TYPE..=VALUE_ENUM => cursor.skip(u64::from(value_arg) + 1),
        VALUE_ARRAY | VALUE_ANNOTATION => {
            if depth >= MAX_NESTING {
                return Err(DexError::NestingTooDeep { offset });
            }
            if value_type == VALUE_ARRAY {
                skip_array(cursor, depth + 1)
            } else {
                skip_annotation(cursor, depth + 1)
            }
        }
        VALUE_NULL | VALUE_BOOLEAN => Ok(()),
        _ => Err(DexError::InvalidValueType { offset, value_type }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(data: &[u8], mode: ValueDecoding) -> Result<u64> {
        decode_encoded_array(data, 0, mode).map(|r| r.len)
    }

    #[test]
    fn heuristic_uses_value_arg_for_every_type() {
        // int with value_arg 1 (2 payload bytes), then a boolean `true` (value_arg 1)
        let data = [0x02, 0x24, 0x34, 0x12, 0x3f, 0xaa, 0xbb];
        assert_eq!(span(&data, ValueDecoding::Heuristic).unwrap(), 7);
        // the boolean carries no payload
        assert_eq!(span(&data, ValueDecoding::Strict).unwrap(), 5);
    }

    #[test]
    fn empty_array_is_just_the_count() {
        assert_eq!(span(&[0x00, 0xff], ValueDecoding::Heuristic).unwrap(), 1);
        assert_eq!(span(&[0x00, 0xff], ValueDecoding::Strict).unwrap(), 1);
    }

    #[test]
    fn strict_walks_nested_arrays_and_annotations() {
        let data = [
            0x03, // 3 values
            0x1c, 0x02, 0x00, 0x05, 0x1e, // array [byte 5, null]
            0x1d, 0x07, 0x01, 0x02, 0x17, 0x09, // annotation type 7 { name 2: string 9 }
            0x26, 0x01, 0x00, 0x00, 0x00, // long with value_arg 1, two payload bytes
        ];
        let len = span(&data, ValueDecoding::Strict).unwrap();
        // 1 + 5 + 6 + 3
        assert_eq!(len, 15);
    }

    #[test]
    fn strict_rejects_unknown_types() {
        let data = [0x01, 0x05, 0x00];
        assert_eq!(
            span(&data, ValueDecoding::Strict).unwrap_err(),
            DexError::InvalidValueType {
                offset: 1,
                value_type: 0x05
            }
        );
    }

    #[test]
    fn strict_bounds_nesting() {
        let mut data = vec![0x01];
        for _ in 0..=MAX_NESTING {
            data.extend_from_slice(&[0x1c, 0x01]);
        }
        data.push(0x1e);
        assert!(matches!(
            span(&data, ValueDecoding::Strict),
            Err(DexError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn payload_past_end_is_truncated() {
        let data = [0x01, 0xe4, 0x00];
        assert!(matches!(
            span(&data, ValueDecoding::Heuristic),
            Err(DexError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn region_starts_at_offset() {
        let data = [0xff, 0xff, 0x01, 0x00, 0x7f];
        assert_eq!(
            decode_encoded_array(&data, 2, ValueDecoding::Heuristic).unwrap(),
            Region::new(2, 3, Category::StaticValues)
        );
    }
}
