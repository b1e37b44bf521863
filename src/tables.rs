//! Fixed-stride index tables and the payloads their rows point at.
//!
//! Each table is painted as one block straight from the header. The rows of
//! `string_ids`, `proto_ids` and `class_defs` reference variable-length data
//! elsewhere in the file; the decoders here measure those payloads.

use object::{LittleEndian as LE, Pod, U32};

use crate::cursor::Cursor;
use crate::error::{DexError, Result};
use crate::header::{Header, SectionDescriptor, Table};
use crate::region::{Category, Region};

/// Size of one `map_item`.
pub const MAP_ITEM_SIZE: u64 = 12;
/// Size of one `type_item` in a `type_list`.
pub const TYPE_ITEM_SIZE: u64 = 2;
/// Entry width droidcolors assumed for a `type_list` (`sizeof(type_id_item)`).
pub const REFERENCE_TYPE_ITEM_SIZE: u64 = 4;
/// Fixed part of an `annotations_directory_item`.
pub const ANNOTATIONS_DIRECTORY_HEADER_SIZE: u64 = 16;
/// Each field, method and parameter annotation entry is an index plus an offset.
pub const ANNOTATION_ENTRY_SIZE: u64 = 8;

/// Offset of `parameters_off` within a `proto_id_item`.
const PROTO_PARAMETERS_OFF: u64 = 8;

/// How wide `type_list` entries are taken to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeListLayout {
    /// 4-byte entries, matching the original tool's region boundaries.
    #[default]
    Reference,
    /// 2-byte `type_item`s, the layout actually found in the file.
    Exact,
}

impl TypeListLayout {
    pub fn item_size(self) -> u64 {
        match self {
            TypeListLayout::Reference => REFERENCE_TYPE_ITEM_SIZE,
            TypeListLayout::Exact => TYPE_ITEM_SIZE,
        }
    }
}

/// `class_def_item` layout.
#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct ClassDefItem {
    class_idx: U32<LE>,
    access_flags: U32<LE>,
    superclass_idx: U32<LE>,
    interfaces_off: U32<LE>,
    source_file_idx: U32<LE>,
    annotations_off: U32<LE>,
    class_data_off: U32<LE>,
    static_values_off: U32<LE>,
}

// Safety:
// - ClassDefItem is `#[repr(C)]`
// - has no invalid byte values.
// - has no padding
unsafe impl Pod for ClassDefItem {}

/// The offsets of one class definition. Zero means absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassDef {
    pub interfaces_off: u32,
    pub annotations_off: u32,
    pub class_data_off: u32,
    pub static_values_off: u32,
}

impl Table {
    pub fn category(self) -> Category {
        match self {
            Table::StringIds => Category::StringIds,
            Table::TypeIds => Category::TypeIds,
            Table::ProtoIds => Category::ProtoIds,
            Table::FieldIds => Category::FieldIds,
            Table::MethodIds => Category::MethodIds,
            Table::ClassDefs => Category::ClassDefs,
        }
    }
}

/// The block covering a whole table.
pub fn table_region(section: &SectionDescriptor) -> Region {
    Region::new(
        u64::from(section.offset),
        section.byte_len(),
        section.table.category(),
    )
}

/// Number of rows that lie entirely inside the file.
pub fn rows_in_bounds(section: &SectionDescriptor, file_len: usize) -> u32 {
    let offset = u64::from(section.offset);
    let file_len = file_len as u64;
    if offset >= file_len {
        return 0;
    }
    let fit = (file_len - offset) / u64::from(section.stride());
    section.count.min(u32::try_from(fit).unwrap_or(u32::MAX))
}

/// The header itself, `[0, header_size)`.
pub fn header_region(header: &Header) -> Region {
    Region::new(0, u64::from(header.header_size()), Category::Header)
}

/// The link section, if the file declares one.
pub fn link_region(header: &Header) -> Option<Region> {
    if header.link_size() == 0 || header.link_off() == 0 {
        return None;
    }
    Some(Region::new(
        u64::from(header.link_off()),
        u64::from(header.link_size()),
        Category::Link,
    ))
}

/// A `map_list`: a 4-byte count followed by 12-byte items.
pub fn decode_map_list(data: &[u8], offset: u32) -> Result<Region> {
    counted_list(data, offset, MAP_ITEM_SIZE, Category::MapList)
}

/// A `type_list`, as used for prototype parameters and class interfaces.
pub fn decode_type_list(
    data: &[u8],
    offset: u32,
    category: Category,
    layout: TypeListLayout,
) -> Result<Region> {
    counted_list(data, offset, layout.item_size(), category)
}

fn counted_list(data: &[u8], offset: u32, item_size: u64, category: Category) -> Result<Region> {
    let mut cursor = Cursor::at(data, offset)?;
    let count = cursor.read_u32()?;
    cursor.skip(u64::from(count) * item_size)?;
    Ok(Region::new(u64::from(offset), cursor.consumed() as u64, category))
}

/// An `annotations_directory_item`, sized from its three counts. The
/// annotation sets it points at are not followed.
pub fn decode_annotations_directory(data: &[u8], offset: u32) -> Result<Region> {
    let mut cursor = Cursor::at(data, offset)?;
    cursor.read_u32()?; // class_annotations_off
    let fields = u64::from(cursor.read_u32()?);
    let methods = u64::from(cursor.read_u32()?);
    let parameters = u64::from(cursor.read_u32()?);
    cursor.skip((fields + methods + parameters) * ANNOTATION_ENTRY_SIZE)?;
    Ok(Region::new(
        u64::from(offset),
        cursor.consumed() as u64,
        Category::AnnotationsDirectory,
    ))
}

/// Reads `string_data_off` from row `index` of `string_ids`.
pub fn string_data_off(data: &[u8], section: &SectionDescriptor, index: u32) -> Result<u32> {
    Cursor::at(data, section.row_offset(index))?.read_u32()
}

/// Reads `parameters_off` from row `index` of `proto_ids`.
pub fn proto_parameters_off(data: &[u8], section: &SectionDescriptor, index: u32) -> Result<u32> {
    Cursor::at(data, section.row_offset(index) + PROTO_PARAMETERS_OFF)?.read_u32()
}

/// Reads row `index` of `class_defs`.
pub fn class_def(data: &[u8], section: &SectionDescriptor, index: u32) -> Result<ClassDef> {
    let item = Cursor::at(data, section.row_offset(index))?.read::<ClassDefItem>()?;
    Ok(ClassDef {
        interfaces_off: item.interfaces_off.get(LE),
        annotations_off: item.annotations_off.get(LE),
        class_data_off: item.class_data_off.get(LE),
        static_values_off: item.static_values_off.get(LE),
    })
}

/// A `string_data_item`: the ULEB128 length prefix and the `length` bytes
/// after it. The payload length is taken as given, not checked against the
/// file; the canvas clips it.
pub fn decode_string_data(data: &[u8], offset: u32, order: bool) -> Result<[Region; 2]> {
    let mut cursor = Cursor::at(data, offset)?;
    let length = cursor.read_uleb128()?;
    let prefix = cursor.consumed() as u64;
    let start = u64::from(offset);
    Ok([
        Region::new(start, prefix, Category::StringLength),
        Region::new(start + prefix, u64::from(length), Category::StringData { order }),
    ])
}

/// Tracks the color toggle used for string data.
///
/// droidcolors compared `string_ids_off` against the value it saw on the
/// previous row, starting from zero. The offset never changes between rows,
/// so only the first row of a table at a non-zero offset gets `order = true`.
#[derive(Debug, Default)]
pub struct StringOrder {
    previous: u32,
}

impl StringOrder {
    pub fn next(&mut self, string_ids_off: u32) -> bool {
        let order = string_ids_off > self.previous;
        self.previous = string_ids_off;
        order
    }
}

/// Fails with `OffsetOutOfRange` when a table starts beyond the file.
pub fn check_table(section: &SectionDescriptor, file_len: usize) -> Result<()> {
    if section.count > 0 && u64::from(section.offset) >= file_len as u64 {
        return Err(DexError::OffsetOutOfRange {
            offset: u64::from(section.offset),
            len: file_len,
        });
    }
    Ok(())
}
