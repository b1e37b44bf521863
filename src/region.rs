//! Regions of the input file.
//!
//! A `Region` is a byte range tagged with the kind of structure that occupies
//! it. Decoders only produce regions; turning a `Category` into a color is the
//! palette's job, and the canvas resolves overlaps by paint order.

/// Which structure a byte range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Header,
    Link,
    MapList,
    StringIds,
    TypeIds,
    ProtoIds,
    FieldIds,
    MethodIds,
    ClassDefs,
    /// ULEB128 length prefix of a `string_data_item`.
    StringLength,
    /// Encoded characters of a `string_data_item`. `order` is the toggle set
    /// while walking the string table.
    StringData { order: bool },
    ProtoParameters,
    Interfaces,
    AnnotationsDirectory,
    /// `code_item` header of a method.
    CodeHeader(MethodKind),
    /// Instruction stream of a method.
    Instructions(MethodKind),
    TryItems,
    DebugInfo(MethodKind),
    /// The encoded field and method records of a `class_data_item`.
    ClassData,
    StaticValues,
}

/// Direct and virtual methods are painted with different colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Direct,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// File offset of the first byte.
    pub start: u64,
    /// Length in bytes.
    pub len: u64,
    pub category: Category,
}

impl Region {
    pub fn new(start: u64, len: u64, category: Category) -> Self {
        Self { start, len, category }
    }

    /// One past the last byte.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.len)
    }
}
