//! Dex header model.
//!
//! The header is the fixed 0x70-byte `header_item` at offset 0. It is read
//! once through a `Pod` view of the buffer, validated, and afterwards only
//! exposed through accessors.

use object::{Bytes, LittleEndian as LE, Pod, U32};

use crate::error::{DexError, HeaderWarning, Result};

pub const HEADER_SIZE: u32 = 0x70;
pub const ENDIAN_CONSTANT: u32 = 0x1234_5678;
pub const EXPECTED_VERSION: &[u8; 3] = b"035";

/// Raw `header_item` layout.
#[derive(Debug, Copy, Clone)]
#[repr(C)]
struct RawHeader {
    magic: [u8; 8],
    checksum: U32<LE>,
    signature: [u8; 20],
    file_size: U32<LE>,
    header_size: U32<LE>,
    endian_tag: U32<LE>,
    link_size: U32<LE>,
    link_off: U32<LE>,
    map_off: U32<LE>,
    string_ids_size: U32<LE>,
    string_ids_off: U32<LE>,
    type_ids_size: U32<LE>,
    type_ids_off: U32<LE>,
    proto_ids_size: U32<LE>,
    proto_ids_off: U32<LE>,
    field_ids_size: U32<LE>,
    field_ids_off: U32<LE>,
    method_ids_size: U32<LE>,
    method_ids_off: U32<LE>,
    class_defs_size: U32<LE>,
    class_defs_off: U32<LE>,
    data_size: U32<LE>,
    data_off: U32<LE>,
}

// Safety:
// - RawHeader is `#[repr(C)]`
// - has no invalid byte values.
// - has no padding
unsafe impl Pod for RawHeader {}

/// The six fixed-stride index tables, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    StringIds,
    TypeIds,
    ProtoIds,
    FieldIds,
    MethodIds,
    ClassDefs,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::StringIds,
        Table::TypeIds,
        Table::ProtoIds,
        Table::FieldIds,
        Table::MethodIds,
        Table::ClassDefs,
    ];

    /// Size of one row in bytes.
    pub fn stride(self) -> u32 {
        match self {
            Table::StringIds | Table::TypeIds => 4,
            Table::ProtoIds => 12,
            Table::FieldIds | Table::MethodIds => 8,
            Table::ClassDefs => 32,
        }
    }
}

/// Location of one fixed-stride table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub table: Table,
    pub offset: u32,
    pub count: u32,
}

impl SectionDescriptor {
    pub fn stride(&self) -> u32 {
        self.table.stride()
    }

    /// Total table size in bytes.
    pub fn byte_len(&self) -> u64 {
        u64::from(self.count) * u64::from(self.stride())
    }

    /// File offset of row `index`.
    pub fn row_offset(&self, index: u32) -> u64 {
        u64::from(self.offset) + u64::from(index) * u64::from(self.stride())
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    raw: RawHeader,
}

impl Header {
    /// Parses and validates the header against the whole file.
    ///
    /// Fails on a bad magic or when the declared size differs from
    /// `data.len()`. Version, endian and header-size mismatches come back as
    /// warnings.
    pub fn parse(data: &[u8]) -> Result<(Self, Vec<HeaderWarning>)> {
        let raw = *Bytes(data)
            .read_at::<RawHeader>(0)
            .map_err(|()| DexError::MalformedHeader)?;

        let magic = &raw.magic;
        if &magic[0..4] != b"dex\n" || magic[7] != 0 {
            return Err(DexError::MalformedHeader);
        }

        let header = Self { raw };
        let declared = header.file_size();
        if declared as usize != data.len() {
            return Err(DexError::SizeMismatch {
                declared,
                actual: data.len(),
            });
        }

        let mut warnings = Vec::new();
        if header.version() != EXPECTED_VERSION {
            warnings.push(HeaderWarning::Version {
                found: String::from_utf8_lossy(header.version()).into_owned(),
            });
        }
        if header.header_size() != HEADER_SIZE {
            warnings.push(HeaderWarning::HeaderSize {
                found: header.header_size(),
            });
        }
        if header.endian_tag() != ENDIAN_CONSTANT {
            warnings.push(HeaderWarning::Endian {
                found: header.endian_tag(),
            });
        }
        Ok((header, warnings))
    }

    pub fn magic(&self) -> &[u8; 8] {
        &self.raw.magic
    }

    /// The three version digits from the magic.
    pub fn version(&self) -> &[u8] {
        &self.raw.magic[4..7]
    }

    pub fn checksum(&self) -> u32 {
        self.raw.checksum.get(LE)
    }

    pub fn signature(&self) -> &[u8; 20] {
        &self.raw.signature
    }

    pub fn file_size(&self) -> u32 {
        self.raw.file_size.get(LE)
    }

    pub fn header_size(&self) -> u32 {
        self.raw.header_size.get(LE)
    }

    pub fn endian_tag(&self) -> u32 {
        self.raw.endian_tag.get(LE)
    }

    pub fn link_size(&self) -> u32 {
        self.raw.link_size.get(LE)
    }

    pub fn link_off(&self) -> u32 {
        self.raw.link_off.get(LE)
    }

    pub fn map_off(&self) -> u32 {
        self.raw.map_off.get(LE)
    }

    pub fn data_size(&self) -> u32 {
        self.raw.data_size.get(LE)
    }

    pub fn data_off(&self) -> u32 {
        self.raw.data_off.get(LE)
    }

    pub fn section(&self, table: Table) -> SectionDescriptor {
        let (count, offset) = match table {
            Table::StringIds => (&self.raw.string_ids_size, &self.raw.string_ids_off),
            Table::TypeIds => (&self.raw.type_ids_size, &self.raw.type_ids_off),
            Table::ProtoIds => (&self.raw.proto_ids_size, &self.raw.proto_ids_off),
            Table::FieldIds => (&self.raw.field_ids_size, &self.raw.field_ids_off),
            Table::MethodIds => (&self.raw.method_ids_size, &self.raw.method_ids_off),
            Table::ClassDefs => (&self.raw.class_defs_size, &self.raw.class_defs_off),
        };
        SectionDescriptor {
            table,
            offset: offset.get(LE),
            count: count.get(LE),
        }
    }
}
