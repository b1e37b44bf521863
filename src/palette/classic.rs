//! The original droidcolors scheme.

use super::{Palette, Rgb};
use crate::region::{Category, MethodKind};

/// Colors used by the droidcolors tool from the PPREW-5 paper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classic;

impl Palette for Classic {
    fn color(&self, category: Category) -> Rgb {
        match category {
            Category::Header => Rgb::new(255, 0, 0),
            Category::Link => Rgb::new(255, 255, 0),
            Category::MapList => Rgb::new(0, 0, 255),
            Category::StringIds => Rgb::new(0, 109, 44),
            Category::TypeIds => Rgb::new(44, 162, 95),
            Category::ProtoIds => Rgb::new(102, 194, 164),
            Category::FieldIds => Rgb::new(153, 216, 201),
            Category::MethodIds => Rgb::new(204, 236, 230),
            Category::ClassDefs => Rgb::new(237, 248, 251),
            Category::StringLength => Rgb::new(240, 0, 0),
            Category::StringData { order } => Rgb::new(if order { 100 } else { 0 }, 109, 44),
            Category::ProtoParameters => Rgb::new(0, 100, 255),
            Category::Interfaces => Rgb::new(0, 150, 255),
            Category::AnnotationsDirectory => Rgb::new(155, 0, 175),
            Category::CodeHeader(MethodKind::Direct) => Rgb::new(84, 39, 136),
            Category::CodeHeader(MethodKind::Virtual) => Rgb::new(179, 88, 6),
            Category::Instructions(MethodKind::Direct) => Rgb::new(153, 142, 195),
            Category::Instructions(MethodKind::Virtual) => Rgb::new(241, 163, 64),
            Category::TryItems => Rgb::new(153, 142, 0),
            Category::DebugInfo(MethodKind::Direct) => Rgb::new(255, 10, 235),
            Category::DebugInfo(MethodKind::Virtual) => Rgb::new(235, 0, 255),
            Category::ClassData => Rgb::new(0, 150, 0),
            Category::StaticValues => Rgb::new(155, 150, 0),
        }
    }
}
