//! Builder for small synthetic dex files.

#![allow(dead_code)]

use dexcolors::header::Table;

const FILE_SIZE: usize = 32;
const LINK_SIZE: usize = 44;
const MAP_OFF: usize = 52;
const DATA_SIZE: usize = 104;

pub struct DexBuilder {
    data: Vec<u8>,
}

impl DexBuilder {
    pub fn new() -> Self {
        let mut data = vec![0u8; 0x70];
        data[0..8].copy_from_slice(b"dex\n035\0");
        data[36..40].copy_from_slice(&0x70u32.to_le_bytes());
        data[40..44].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        Self { data }
    }

    /// Appends `bytes` at the next 4-byte boundary and returns their offset.
    pub fn append(&mut self, bytes: &[u8]) -> u32 {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(bytes);
        offset
    }

    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn set_u32(&mut self, at: usize, value: u32) {
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn set_table(&mut self, table: Table, count: u32, offset: u32) {
        let at = match table {
            Table::StringIds => 56,
            Table::TypeIds => 64,
            Table::ProtoIds => 72,
            Table::FieldIds => 80,
            Table::MethodIds => 88,
            Table::ClassDefs => 96,
        };
        self.set_u32(at, count);
        self.set_u32(at + 4, offset);
    }

    pub fn set_link(&mut self, size: u32, offset: u32) {
        self.set_u32(LINK_SIZE, size);
        self.set_u32(LINK_SIZE + 4, offset);
    }

    pub fn set_map(&mut self, offset: u32) {
        self.set_u32(MAP_OFF, offset);
    }

    pub fn set_data(&mut self, size: u32, offset: u32) {
        self.set_u32(DATA_SIZE, size);
        self.set_u32(DATA_SIZE + 4, offset);
    }

    pub fn set_version(&mut self, version: &[u8; 3]) {
        self.data[4..7].copy_from_slice(version);
    }

    /// Fixes up `file_size` and returns the file.
    pub fn finish(mut self) -> Vec<u8> {
        let len = self.data.len() as u32;
        self.set_u32(FILE_SIZE, len);
        self.data
    }
}

pub fn uleb128(mut value: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// A `class_def_item` with only the offsets filled in.
pub fn class_def(interfaces: u32, annotations: u32, class_data: u32, static_values: u32) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    out[12..16].copy_from_slice(&interfaces.to_le_bytes());
    out[20..24].copy_from_slice(&annotations.to_le_bytes());
    out[24..28].copy_from_slice(&class_data.to_le_bytes());
    out[28..32].copy_from_slice(&static_values.to_le_bytes());
    out
}

/// A `code_item` with `insns` instruction units and `tries` zeroed try items.
pub fn code_item(tries: u16, debug_info_off: u32, insns: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&tries.to_le_bytes());
    out.extend_from_slice(&debug_info_off.to_le_bytes());
    out.extend_from_slice(&insns.to_le_bytes());
    out.resize(out.len() + insns as usize * 2, 0x00);
    if tries > 0 {
        if insns % 2 == 1 {
            out.extend_from_slice(&[0, 0]);
        }
        out.resize(out.len() + tries as usize * 8, 0);
    }
    out
}
