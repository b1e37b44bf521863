//! Error types.
//!
//! `DexError` covers both fatal conditions (a bad magic or a size mismatch stops
//! the whole run) and local decode failures, which only abort the substructure
//! being decoded. `HeaderWarning` holds the non-fatal header findings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// Magic bytes are not `dex\n???\0`, or the buffer is shorter than a header.
    #[error("not a dex file")]
    MalformedHeader,

    /// Declared `file_size` does not match the length of the input.
    #[error("file size is {actual} bytes but the header declares {declared}")]
    SizeMismatch { declared: u32, actual: usize },

    /// A read would run past the end of the buffer.
    #[error("truncated stream at offset {offset:#x}")]
    TruncatedStream { offset: usize },

    /// An offset field points outside the buffer.
    #[error("offset {offset:#x} out of range (file is {len} bytes)")]
    OffsetOutOfRange { offset: u64, len: usize },

    /// Unknown `value_type` in an encoded value (strict mode only).
    #[error("invalid encoded value type {value_type:#04x} at offset {offset:#x}")]
    InvalidValueType { offset: usize, value_type: u8 },

    /// Nested encoded arrays or annotations exceed the depth limit.
    #[error("encoded value nesting too deep at offset {offset:#x}")]
    NestingTooDeep { offset: usize },
}

pub type Result<T> = std::result::Result<T, DexError>;

/// Header checks that are reported but do not stop processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderWarning {
    #[error("dex file version {found:?} != \"035\"")]
    Version { found: String },

    #[error("endian tag {found:#010x} != 0x12345678")]
    Endian { found: u32 },

    #[error("header size {found:#x} != 0x70")]
    HeaderSize { found: u32 },
}
