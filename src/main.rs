//! Entry point for dexcolors.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Map the input file into memory.
//! 3. Validate the header, walk the file and paint the canvas.
//! 4. Write the canvas as a PPM image.
//!
//! Error handling is done via `anyhow`. Fatal header errors exit non-zero
//! before any image is written.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;

use dexcolors::config::Config;
use dexcolors::palette::classic::Classic;
use dexcolors::{logging, report, walker, writer};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level);

    if !config.silent {
        println!("{}", report::banner());
    }

    let file = File::open(&config.input)
        .with_context(|| format!("can't open dex file {}", config.input.display()))?;
    // The mapping is only read, and the file is not expected to change under us.
    let mmap = unsafe { Mmap::map(&file)? };

    let rendering = walker::render(&mmap, Classic, config.walk_options())
        .with_context(|| format!("failed to process {}", config.input.display()))?;

    if config.log {
        print!(
            "{}",
            report::header_table(&config.input, &rendering.header, &rendering.canvas)
        );
    }

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| writer::default_output_path(&config.input));
    writer::write_ppm(&rendering.canvas, &output)?;

    println!("Wrote {}", output.display());
    Ok(())
}
