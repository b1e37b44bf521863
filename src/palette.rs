//! Color schemes.
//!
//! The `Palette` trait decides what a region looks like. Decoders never see
//! colors, so a different scheme only needs a new implementation here.

use crate::region::Category;

pub mod classic;

/// An RGB triple as written to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// A mapping from region category to color.
pub trait Palette {
    fn color(&self, category: Category) -> Rgb;
}
