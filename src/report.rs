//! Human-readable dump of the header (`--log`) and the startup banner.

use std::fmt::{self, Write};
use std::path::Path;

use crate::canvas::Canvas;
use crate::header::{Header, Table};

pub const PAPER: &str = "Enriching Reverse Engineering through Visual Exploration of Android Binaries";
pub const WORKSHOP: &str = "5th Program protection and Reverse Engineering Workshop (PPREW-5)";
pub const DOI: &str = "http://dx.doi.org/10.1145/2843859.2843866";

pub fn banner() -> String {
    format!(
        "\n=== dexcolors {} \nPaper: {}\n{}\n{}\n===",
        env!("CARGO_PKG_VERSION"),
        PAPER,
        WORKSHOP,
        DOI
    )
}

fn table_name(table: Table) -> &'static str {
    match table {
        Table::StringIds => "String",
        Table::TypeIds => "Type",
        Table::ProtoIds => "Prototype",
        Table::FieldIds => "Field",
        Table::MethodIds => "Method",
        Table::ClassDefs => "Class",
    }
}

fn size_off(out: &mut String, name: &str, size: u32, off: u32) -> fmt::Result {
    writeln!(out, "{:<25}{:>6}", format!("{name}_size"), size)?;
    writeln!(out, "{:<35}{:>6x} hex", format!("{name}_offset"), off)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn write_header_table(
    out: &mut String,
    input: &Path,
    header: &Header,
    canvas: &Canvas,
) -> fmt::Result {
    writeln!(out, "{:<25}{}", "Dex file:", input.display())?;
    writeln!(out, "{:<25}{}", "Magic", header.magic().escape_ascii())?;
    writeln!(out, "{:<25}{:08x}", "Checksum", header.checksum())?;
    writeln!(out, "{:<25}{}", "Signature", hex(header.signature()))?;
    writeln!(out, "{:<25}{:>6}", "File size", header.file_size())?;
    writeln!(out, "{:<25}{:>6}", "Header Size(bytes)", header.header_size())?;
    writeln!(out, "{:<33}{:#x}", "Header Size", header.header_size())?;
    out.push_str("\n\n");

    size_off(out, "Link", header.link_size(), header.link_off())?;
    writeln!(out, "{:<35}{:>6x} hex", "Map_offset", header.map_off())?;
    for table in Table::ALL {
        let section = header.section(table);
        size_off(out, table_name(table), section.count, section.offset)?;
    }
    size_off(out, "Data", header.data_size(), header.data_off())?;
    out.push_str("\n\n");

    writeln!(out, "{:<30}{:>6}", "Width", canvas.width())?;
    writeln!(out, "{:<30}{:>6}", "Height", canvas.height())
}

/// The header table printed with `--log`.
pub fn header_table(input: &Path, header: &Header, canvas: &Canvas) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    write_header_table(&mut out, input, header, canvas)
        .map(|()| out)
        .unwrap_or_default()
}
