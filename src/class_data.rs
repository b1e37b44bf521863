//! `class_data_item` decoding.
//!
//! A class body is four ULEB128 counts followed by that many encoded fields
//! and methods. Nothing in it records its own length, so the only way to
//! measure it is to decode every record. Methods with a non-zero `code_off`
//! lead to a `code_item`, which in turn may point at a `debug_info_item`.

use object::{LittleEndian as LE, Pod, U16, U32};
use tracing::debug;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::region::{Category, MethodKind, Region};
use crate::utils::align_up;

/// Size of the fixed part of a `code_item`.
pub const CODE_ITEM_HEADER_SIZE: u64 = 16;

/// Size of one `try_item`: start address, instruction count, handler offset.
pub const TRY_ITEM_SIZE: u64 = 8;

#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct CodeItemHeader {
    registers_size: U16<LE>,
    ins_size: U16<LE>,
    outs_size: U16<LE>,
    tries_size: U16<LE>,
    debug_info_off: U32<LE>,
    insns_size: U32<LE>,
}

// Safety:
// - CodeItemHeader is `#[repr(C)]`
// - has no invalid byte values.
// - has no padding
unsafe impl Pod for CodeItemHeader {}

/// Member counts from the start of a class body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassDataCounts {
    pub static_fields: u32,
    pub instance_fields: u32,
    pub direct_methods: u32,
    pub virtual_methods: u32,
}

/// Decodes the class body at `offset` and returns every region it covers.
///
/// Code items are painted first, in method order; the last region spans the
/// encoded member records themselves. A broken code item only loses its own
/// regions, but a truncated member stream fails the whole class body.
pub fn decode_class_data(data: &[u8], offset: u32) -> Result<Vec<Region>> {
    let mut cursor = Cursor::at(data, offset)?;
    let counts = ClassDataCounts {
        static_fields: cursor.read_uleb128()?,
        instance_fields: cursor.read_uleb128()?,
        direct_methods: cursor.read_uleb128()?,
        virtual_methods: cursor.read_uleb128()?,
    };

    // Encoded fields carry no offsets, they are only stepped over.
    for _ in 0..u64::from(counts.static_fields) + u64::from(counts.instance_fields) {
        cursor.read_uleb128()?; // field_idx_diff
        cursor.read_uleb128()?; // access_flags
    }

    let mut regions = Vec::new();
    for (kind, count) in [
        (MethodKind::Direct, counts.direct_methods),
        (MethodKind::Virtual, counts.virtual_methods),
    ] {
        for _ in 0..count {
            cursor.read_uleb128()?; // method_idx_diff
            cursor.read_uleb128()?; // access_flags
            let code_off = cursor.read_uleb128()?;
            // Zero means abstract or native.
            if code_off == 0 {
                continue;
            }
            match decode_code_item(data, code_off, kind) {
                Ok(code) => regions.extend(code),
                Err(err) => debug!("skipping code item at {:#x}: {}", code_off, err),
            }
        }
    }

    regions.push(Region::new(
        u64::from(offset),
        cursor.consumed() as u64,
        Category::ClassData,
    ));
    Ok(regions)
}

/// Decodes one `code_item`: header, instructions, optional try table and the
/// debug info it references.
pub fn decode_code_item(data: &[u8], offset: u32, kind: MethodKind) -> Result<Vec<Region>> {
    let start = u64::from(offset);
    let mut cursor = Cursor::at(data, offset)?;
    let header = cursor.read::<CodeItemHeader>()?;
    let insns_len = u64::from(header.insns_size.get(LE)) * 2;
    let tries_size = header.tries_size.get(LE);
    let debug_info_off = header.debug_info_off.get(LE);

    cursor.skip(insns_len)?;
    let mut regions = vec![
        Region::new(start, CODE_ITEM_HEADER_SIZE, Category::CodeHeader(kind)),
        Region::new(start + CODE_ITEM_HEADER_SIZE, insns_len, Category::Instructions(kind)),
    ];

    if tries_size > 0 {
        // try_items are 4-byte aligned; an odd instruction count leaves a 2-byte pad.
        let tries_rel = align_up(CODE_ITEM_HEADER_SIZE + insns_len, 4);
        let tries_len = u64::from(tries_size) * TRY_ITEM_SIZE;
        cursor.skip(tries_rel - (CODE_ITEM_HEADER_SIZE + insns_len))?;
        cursor.skip(tries_len)?;
        regions.push(Region::new(start + tries_rel, tries_len, Category::TryItems));
    }

    if debug_info_off != 0 {
        match decode_debug_info(data, debug_info_off, kind) {
            Ok(region) => regions.push(region),
            Err(err) => debug!("skipping debug info at {:#x}: {}", debug_info_off, err),
        }
    }
    Ok(regions)
}

/// Measures the fixed prefix of a `debug_info_item`: `line_start`,
/// `parameters_size` and the parameter name list. The state machine bytecode
/// that follows is not part of the region.
pub fn decode_debug_info(data: &[u8], offset: u32, kind: MethodKind) -> Result<Region> {
    let mut cursor = Cursor::at(data, offset)?;
    cursor.read_uleb128()?; // line_start
    let parameters_size = cursor.read_uleb128()?;
    for _ in 0..parameters_size {
        cursor.read_uleb128()?; // parameter_names, uleb128p1
    }
    Ok(Region::new(
        u64::from(offset),
        cursor.consumed() as u64,
        Category::DebugInfo(kind),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DexError;

    fn code_item(tries: u16, debug_off: u32, insns: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&tries.to_le_bytes());
        out.extend_from_slice(&debug_off.to_le_bytes());
        out.extend_from_slice(&insns.to_le_bytes());
        out.resize(out.len() + insns as usize * 2, 0x0e);
        out
    }

    fn find(regions: &[Region], category: Category) -> Region {
        *regions
            .iter()
            .find(|r| r.category == category)
            .unwrap_or_else(|| panic!("no {category:?} region in {regions:?}"))
    }

    #[test]
    fn empty_class_body_is_four_bytes() {
        let mut data = vec![0xffu8; 0x20];
        data[0x10..0x14].fill(0);
        let regions = decode_class_data(&data, 0x10).unwrap();
        assert_eq!(regions, vec![Region::new(0x10, 4, Category::ClassData)]);
    }

    #[test]
    fn fields_are_consumed_but_not_painted() {
        // 1 static, 1 instance field, no methods; second field uses a 2-byte idx diff.
        let data = [1, 1, 0, 0, 0x00, 0x19, 0x81, 0x01, 0x02];
        let regions = decode_class_data(&data, 0).unwrap();
        assert_eq!(regions, vec![Region::new(0, 9, Category::ClassData)]);
    }

    #[test]
    fn direct_method_with_code() {
        let mut data = vec![0u8; 0x40];
        // class body at 0: 0 fields, 1 direct method -> code at 0x20
        data[..7].copy_from_slice(&[0, 0, 1, 0, 0, 0x01, 0x20]);
        let code = code_item(0, 0, 3);
        data[0x20..0x20 + code.len()].copy_from_slice(&code);

        let regions = decode_class_data(&data, 0).unwrap();
        assert_eq!(
            regions,
            vec![
                Region::new(0x20, 16, Category::CodeHeader(MethodKind::Direct)),
                Region::new(0x30, 6, Category::Instructions(MethodKind::Direct)),
                Region::new(0, 7, Category::ClassData),
            ]
        );
    }

    #[test]
    fn virtual_methods_use_their_own_categories() {
        let mut data = vec![0u8; 0x40];
        // one abstract direct method, one virtual method with code
        data[..10].copy_from_slice(&[0, 0, 1, 1, 0, 0x01, 0x00, 0x01, 0x01, 0x20]);
        let code = code_item(0, 0, 1);
        data[0x20..0x20 + code.len()].copy_from_slice(&code);

        let regions = decode_class_data(&data, 0).unwrap();
        find(&regions, Category::CodeHeader(MethodKind::Virtual));
        find(&regions, Category::Instructions(MethodKind::Virtual));
        assert_eq!(find(&regions, Category::ClassData).len, 10);
    }

    #[test]
    fn odd_instruction_count_pads_try_table() {
        let mut even = code_item(2, 0, 2);
        even.resize(even.len() + 16, 0);
        let mut odd = code_item(2, 0, 3);
        odd.resize(odd.len() + 2 + 16, 0);

        let even_tries =
            find(&decode_code_item(&even, 0, MethodKind::Direct).unwrap(), Category::TryItems);
        let odd_tries =
            find(&decode_code_item(&odd, 0, MethodKind::Direct).unwrap(), Category::TryItems);

        assert_eq!(even_tries, Region::new(20, 16, Category::TryItems));
        assert_eq!(odd_tries, Region::new(24, 16, Category::TryItems));
        // one extra instruction unit (2 bytes) plus the 2-byte pad
        assert_eq!(odd_tries.start - even_tries.start, 4);
        assert_eq!((odd_tries.start - 16 - 6) - (even_tries.start - 16 - 4), 2);
    }

    #[test]
    fn truncated_try_table_fails_code_item() {
        let mut data = code_item(2, 0, 2);
        data.resize(data.len() + 8, 0);
        assert!(matches!(
            decode_code_item(&data, 0, MethodKind::Direct),
            Err(DexError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn debug_info_length_is_bytes_consumed() {
        // line_start = 300 (2 bytes), 2 parameters: 0x00 and 0x8f01 (2 bytes)
        let data = [0xffu8, 0xac, 0x02, 0x02, 0x00, 0x8f, 0x01, 0x07, 0x00];
        let region = decode_debug_info(&data, 1, MethodKind::Virtual).unwrap();
        assert_eq!(region, Region::new(1, 6, Category::DebugInfo(MethodKind::Virtual)));
    }

    #[test]
    fn code_item_follows_debug_info() {
        let mut data = code_item(0, 0x20, 2);
        data.resize(0x20, 0);
        data.extend_from_slice(&[0x01, 0x01, 0x05]);
        let regions = decode_code_item(&data, 0, MethodKind::Direct).unwrap();
        assert_eq!(
            find(&regions, Category::DebugInfo(MethodKind::Direct)),
            Region::new(0x20, 3, Category::DebugInfo(MethodKind::Direct))
        );
    }

    #[test]
    fn broken_debug_info_keeps_code_regions() {
        let data = code_item(0, 0x1000, 2);
        let regions = decode_code_item(&data, 0, MethodKind::Direct).unwrap();
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn broken_code_item_does_not_fail_class_body() {
        // one direct method pointing past the end of the buffer
        let data = [0, 0, 1, 0, 0, 0x01, 0xff, 0x01];
        let regions = decode_class_data(&data, 0).unwrap();
        assert_eq!(regions, vec![Region::new(0, 8, Category::ClassData)]);
    }

    #[test]
    fn truncated_member_stream_fails_class_body() {
        let data = [0, 0, 2, 0, 0, 0x01, 0x00];
        assert!(matches!(
            decode_class_data(&data, 0),
            Err(DexError::TruncatedStream { .. })
        ));
    }
}
