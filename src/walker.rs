//! Structural walk of a dex file.
//!
//! The `Walker` starts from the header's offsets and visits every structure
//! droidcolors knows about, in its paint order:
//! 1. Header, link section and map list.
//! 2. The six fixed-stride tables as whole blocks.
//! 3. String data, one prefix and one payload region per `string_ids` row.
//! 4. Prototype parameter lists.
//! 5. Per class definition: interfaces, annotations directory, class body
//!    (with code items and debug info) and static values.
//!
//! Decoding never paints directly. Each substructure yields regions or an
//! error; a failed substructure is logged and skipped, the walk goes on.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::canvas::{Canvas, Painter};
use crate::class_data::decode_class_data;
use crate::encoded_array::{decode_encoded_array, ValueDecoding};
use crate::error::{HeaderWarning, Result};
use crate::header::{Header, Table};
use crate::palette::Palette;
use crate::region::{Category, Region};
use crate::tables::{self, StringOrder, TypeListLayout};

/// Knobs for a walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    pub values: ValueDecoding,
    pub type_lists: TypeListLayout,
    /// Decode class definitions on the rayon pool. The region order, and so
    /// the painted result, is the same as a sequential walk.
    pub parallel: bool,
}

/// Regions in paint order plus the number of substructures that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Walk {
    pub regions: Vec<Region>,
    pub skipped: usize,
}

impl Walk {
    fn push<I>(&mut self, what: &str, offset: u64, result: Result<I>)
    where
        I: IntoIterator<Item = Region>,
    {
        match result {
            Ok(regions) => self.regions.extend(regions),
            Err(err) => {
                debug!("skipping {} at {:#x}: {}", what, offset, err);
                self.skipped += 1;
            }
        }
    }

    fn append(&mut self, mut other: Walk) {
        self.regions.append(&mut other.regions);
        self.skipped += other.skipped;
    }
}

pub struct Walker<'a> {
    data: &'a [u8],
    header: &'a Header,
    options: WalkOptions,
}

impl<'a> Walker<'a> {
    pub fn new(data: &'a [u8], header: &'a Header, options: WalkOptions) -> Self {
        Self {
            data,
            header,
            options,
        }
    }

    pub fn walk(&self) -> Walk {
        let mut walk = Walk::default();
        self.walk_header(&mut walk);
        for table in Table::ALL {
            walk.regions
                .push(tables::table_region(&self.header.section(table)));
        }
        self.walk_strings(&mut walk);
        self.walk_protos(&mut walk);
        self.walk_class_defs(&mut walk);
        walk
    }

    fn walk_header(&self, walk: &mut Walk) {
        walk.regions.push(tables::header_region(self.header));
        walk.regions.extend(tables::link_region(self.header));

        let map_off = self.header.map_off();
        if map_off != 0 {
            if map_off < self.header.data_off() {
                warn!("map offset {:#x} not in the data section", map_off);
            }
            walk.push(
                "map list",
                u64::from(map_off),
                tables::decode_map_list(self.data, map_off).map(Some),
            );
        }
    }

    /// Number of rows of `table` to visit. Rows past the end of the file are
    /// counted as one skipped substructure.
    fn rows(&self, table: Table, walk: &mut Walk) -> u32 {
        let section = self.header.section(table);
        if let Err(err) = tables::check_table(&section, self.data.len()) {
            debug!("skipping {:?}: {}", table, err);
            walk.skipped += 1;
            return 0;
        }
        let rows = tables::rows_in_bounds(&section, self.data.len());
        if rows < section.count {
            debug!(
                "{:?} truncated: {} of {} rows inside the file",
                table, rows, section.count
            );
            walk.skipped += 1;
        }
        rows
    }

    fn walk_strings(&self, walk: &mut Walk) {
        let section = self.header.section(Table::StringIds);
        let mut toggle = StringOrder::default();
        for index in 0..self.rows(Table::StringIds, walk) {
            // Always the same header field; see `StringOrder`.
            let order = toggle.next(section.offset);
            let result = tables::string_data_off(self.data, &section, index)
                .and_then(|offset| tables::decode_string_data(self.data, offset, order));
            walk.push("string data", section.row_offset(index), result);
        }
    }

    fn walk_protos(&self, walk: &mut Walk) {
        let section = self.header.section(Table::ProtoIds);
        for index in 0..self.rows(Table::ProtoIds, walk) {
            let result = tables::proto_parameters_off(self.data, &section, index).and_then(
                |offset| match offset {
                    0 => Ok(None),
                    _ => tables::decode_type_list(
                        self.data,
                        offset,
                        Category::ProtoParameters,
                        self.options.type_lists,
                    )
                    .map(Some),
                },
            );
            walk.push("prototype parameters", section.row_offset(index), result);
        }
    }

    fn walk_class_defs(&self, walk: &mut Walk) {
        let rows = self.rows(Table::ClassDefs, walk);
        if self.options.parallel {
            // collect() keeps index order, so paint order matches the sequential walk.
            let per_class: Vec<Walk> = (0..rows)
                .into_par_iter()
                .map(|index| self.walk_class_def(index))
                .collect();
            for class in per_class {
                walk.append(class);
            }
        } else {
            for index in 0..rows {
                walk.append(self.walk_class_def(index));
            }
        }
    }

    fn walk_class_def(&self, index: u32) -> Walk {
        let section = self.header.section(Table::ClassDefs);
        let mut walk = Walk::default();
        let def = match tables::class_def(self.data, &section, index) {
            Ok(def) => def,
            Err(err) => {
                walk.push::<Option<Region>>("class def", section.row_offset(index), Err(err));
                return walk;
            }
        };

        if def.interfaces_off != 0 {
            walk.push(
                "interfaces",
                u64::from(def.interfaces_off),
                tables::decode_type_list(
                    self.data,
                    def.interfaces_off,
                    Category::Interfaces,
                    self.options.type_lists,
                )
                .map(Some),
            );
        }
        if def.annotations_off != 0 {
            walk.push(
                "annotations directory",
                u64::from(def.annotations_off),
                tables::decode_annotations_directory(self.data, def.annotations_off).map(Some),
            );
        }
        if def.class_data_off != 0 {
            walk.push(
                "class data",
                u64::from(def.class_data_off),
                decode_class_data(self.data, def.class_data_off),
            );
        }
        if def.static_values_off != 0 {
            walk.push(
                "static values",
                u64::from(def.static_values_off),
                decode_encoded_array(self.data, def.static_values_off, self.options.values)
                    .map(Some),
            );
        }
        walk
    }
}

/// A finished image and what went into it.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub header: Header,
    pub warnings: Vec<HeaderWarning>,
    pub canvas: Canvas,
    pub regions: usize,
    pub skipped: usize,
}

/// Parses, walks and paints `data` in one go.
///
/// Fatal header errors are returned before anything is allocated; header
/// warnings are logged and kept in the result.
pub fn render<P: Palette>(data: &[u8], palette: P, options: WalkOptions) -> Result<Rendering> {
    let (header, warnings) = Header::parse(data)?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    let canvas = Canvas::new(header.file_size());
    info!("image {} x {}", canvas.width(), canvas.height());

    let walk = Walker::new(data, &header, options).walk();
    let mut painter = Painter::new(palette, canvas);
    painter.paint_all(&walk.regions);
    info!(
        "painted {} regions, skipped {} substructures",
        walk.regions.len(),
        walk.skipped
    );

    Ok(Rendering {
        header,
        warnings,
        canvas: painter.finish(),
        regions: walk.regions.len(),
        skipped: walk.skipped,
    })
}
