//! Dex file layout visualizer.
//!
//! This library turns an Android `.dex` file into an image in which every
//! byte is a pixel colored by the structure it belongs to.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `error`: Fatal and local decode errors, header warnings.
//! - `cursor`: Bounds-checked reads and ULEB128 decoding.
//! - `header`: The validated dex header.
//! - `tables`: Fixed-stride index tables and their payloads.
//! - `class_data`: Class bodies, code items and debug info.
//! - `encoded_array`: Static value arrays.
//! - `region`: Byte ranges tagged with a structure category.
//! - `walker`: The structural walk producing regions.
//! - `palette`: Category to color mapping.
//! - `canvas`: The pixel grid.
//! - `writer`: PPM output.
//! - `report`: Banner and header table.
//! - `logging`: Tracing setup.
//! - `utils`: Alignment helper.

pub mod canvas;
pub mod class_data;
pub mod config;
pub mod cursor;
pub mod encoded_array;
pub mod error;
pub mod header;
pub mod logging;
pub mod palette;
pub mod region;
pub mod report;
pub mod tables;
pub mod utils;
pub mod walker;
pub mod writer;

pub use error::{DexError, HeaderWarning, Result};
pub use walker::{render, Rendering, WalkOptions};
