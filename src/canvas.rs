//! The output pixel grid.
//!
//! Pixel `d` of the canvas stands for byte `d` of the input, rows are
//! `CANVAS_WIDTH` pixels wide. Painting is unconditional: on overlap the last
//! region painted wins.

use tracing::trace;

use crate::palette::{Palette, Rgb};
use crate::region::Region;

pub const CANVAS_WIDTH: usize = 256;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl Canvas {
    /// A black canvas for a file of `file_size` bytes: one pixel per byte
    /// plus one spare row.
    pub fn new(file_size: u32) -> Self {
        let width = CANVAS_WIDTH;
        let height = (file_size as usize).div_ceil(width) + 1;
        Self {
            pixels: vec![Rgb::BLACK; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fills `[offset, offset + len)` with `color`, clipped to the canvas.
    pub fn paint(&mut self, offset: u64, len: u64, color: Rgb) {
        let total = self.pixels.len() as u64;
        let start = offset.min(total);
        let end = offset.saturating_add(len).min(total);
        self.pixels[start as usize..end as usize].fill(color);
    }

    /// All pixels in byte order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, offset: usize) -> Option<Rgb> {
        self.pixels.get(offset).copied()
    }
}

/// Applies regions to a canvas through a palette.
pub struct Painter<P: Palette> {
    palette: P,
    canvas: Canvas,
}

impl<P: Palette> Painter<P> {
    pub fn new(palette: P, canvas: Canvas) -> Self {
        Self { palette, canvas }
    }

    pub fn paint(&mut self, region: &Region) {
        trace!(
            "paint [{:#x}, {:#x}) {:?}",
            region.start,
            region.end(),
            region.category
        );
        let color = self.palette.color(region.category);
        self.canvas.paint(region.start, region.len, color);
    }

    /// Paints regions in order.
    pub fn paint_all<'r>(&mut self, regions: impl IntoIterator<Item = &'r Region>) {
        for region in regions {
            self.paint(region);
        }
    }

    pub fn finish(self) -> Canvas {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::classic::Classic;
    use crate::region::Category;

    const A: Rgb = Rgb::new(1, 2, 3);
    const B: Rgb = Rgb::new(4, 5, 6);

    #[test]
    fn height_has_a_spare_row() {
        assert_eq!(Canvas::new(0x70).height(), 2);
        assert_eq!(Canvas::new(256).height(), 2);
        assert_eq!(Canvas::new(257).height(), 3);
        assert_eq!(Canvas::new(1000).pixels().len(), 256 * 5);
    }

    #[test]
    fn later_paint_wins_on_overlap() {
        let mut canvas = Canvas::new(200);
        canvas.paint(100, 10, A);
        canvas.paint(105, 10, B);
        assert!((100..105).all(|d| canvas.pixel(d) == Some(A)));
        assert!((105..115).all(|d| canvas.pixel(d) == Some(B)));
        assert_eq!(canvas.pixel(99), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(115), Some(Rgb::BLACK));
    }

    #[test]
    fn paint_is_clipped() {
        let mut canvas = Canvas::new(10);
        let total = canvas.pixels().len() as u64;
        canvas.paint(total - 2, u64::MAX, A);
        canvas.paint(total + 5, 3, B);
        assert_eq!(canvas.pixel(total as usize - 1), Some(A));
        assert_eq!(canvas.pixel(total as usize - 3), Some(Rgb::BLACK));
    }

    #[test]
    fn painter_uses_palette() {
        let mut painter = Painter::new(Classic, Canvas::new(16));
        painter.paint_all(&[Region::new(0, 4, Category::Header)]);
        let canvas = painter.finish();
        assert_eq!(canvas.pixel(3), Some(Rgb::new(255, 0, 0)));
        assert_eq!(canvas.pixel(4), Some(Rgb::BLACK));
    }
}
