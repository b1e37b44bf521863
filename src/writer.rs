//! PPM image writer.
//!
//! Writes the canvas as a binary PPM (`P6`): a text header with the
//! dimensions and maximum value, followed by raw RGB triples in byte order.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::canvas::Canvas;

pub const EXTENSION: &str = "ppm";

/// `<input file name>.ppm` in the current directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Serializes the canvas into `out`.
pub fn write_ppm_to<W: Write>(canvas: &Canvas, out: &mut W) -> std::io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", canvas.width(), canvas.height())?;
    let bytes: Vec<u8> = canvas
        .pixels()
        .iter()
        .flat_map(|p| [p.red, p.green, p.blue])
        .collect();
    out.write_all(&bytes)
}

/// Write the canvas to disk as a PPM file.
pub fn write_ppm(canvas: &Canvas, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("can't create image file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_ppm_to(canvas, &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
