//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.

use clap::Parser;
use std::path::PathBuf;

use crate::encoded_array::ValueDecoding;
use crate::tables::TypeListLayout;
use crate::walker::WalkOptions;

/// Create an image representing the layout of a .dex file.
///
/// Every byte of the input becomes one pixel of a 256-pixel-wide PPM image,
/// colored by the structure it belongs to.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input .dex file
    pub input: PathBuf,

    /// Output image (defaults to the input's file name with `.ppm` appended)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Silence: do not print the banner
    #[arg(short, long)]
    pub silent: bool,

    /// Log: print the header table
    #[arg(short, long)]
    pub log: bool,

    /// Size encoded static values with the full value-type table
    #[arg(long)]
    pub strict_values: bool,

    /// Size type lists with 2-byte entries instead of the original 4-byte ones
    #[arg(long)]
    pub exact_type_lists: bool,

    /// Decode class definitions in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}

impl Config {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            values: if self.strict_values {
                ValueDecoding::Strict
            } else {
                ValueDecoding::Heuristic
            },
            type_lists: if self.exact_type_lists {
                TypeListLayout::Exact
            } else {
                TypeListLayout::Reference
            },
            parallel: self.parallel,
        }
    }
}
