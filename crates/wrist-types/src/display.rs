//! Display collaborator trait.
//!
//! The runtime decides *what* is drawn and in which order; a [`Display`]
//! implementation decides how pixels reach the panel. Only `clear`,
//! `draw_pixel`, `draw_text` and `refresh` are required. The shape
//! primitives have default implementations in terms of `draw_pixel` that
//! backends may override with faster native routines.

use crate::error::Result;

/// Panel width of the reference device in pixels.
pub const DISPLAY_WIDTH: i32 = 128;
/// Panel height of the reference device in pixels.
pub const DISPLAY_HEIGHT: i32 = 64;

/// Width of one glyph cell at size 1 (5 px glyph + 1 px spacing).
pub const GLYPH_ADVANCE: i32 = 6;
/// Height of one glyph cell at size 1.
pub const GLYPH_HEIGHT: i32 = 8;

/// Monochrome pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelColor {
    Black,
    White,
    /// Flip whatever is already there.
    Inverse,
}

/// Width in pixels of `text` drawn at `size`.
pub fn text_width(text: &str, size: u8) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE * size.max(1) as i32
}

/// Drawing surface consumed by the render compositor.
pub trait Display {
    // -----------------------------------------------------------------------
    // Required
    // -----------------------------------------------------------------------

    /// Clear the frame to black.
    fn clear(&mut self) -> Result<()>;

    /// Set a single pixel. Off-panel coordinates are ignored.
    fn draw_pixel(&mut self, x: i32, y: i32, color: PixelColor) -> Result<()>;

    /// Draw a string with the backend's bitmap font, scaled by `size`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: PixelColor, size: u8) -> Result<()>;

    /// Push the composed frame to the panel. Called once per frame.
    fn refresh(&mut self) -> Result<()>;

    // -----------------------------------------------------------------------
    // Shape primitives (default: rasterized through `draw_pixel`)
    // -----------------------------------------------------------------------

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: PixelColor) -> Result<()> {
        for dx in 0..w.max(0) {
            self.draw_pixel(x + dx, y, color)?;
        }
        Ok(())
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: PixelColor) -> Result<()> {
        for dy in 0..h.max(0) {
            self.draw_pixel(x, y + dy, color)?;
        }
        Ok(())
    }

    /// Bresenham line between two points, inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: PixelColor) -> Result<()> {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.draw_pixel(x, y, color)?;
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    /// Outline of a rectangle.
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: PixelColor) -> Result<()> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        self.draw_hline(x, y, w, color)?;
        self.draw_hline(x, y + h - 1, w, color)?;
        self.draw_vline(x, y + 1, h - 2, color)?;
        self.draw_vline(x + w - 1, y + 1, h - 2, color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: PixelColor) -> Result<()> {
        for dy in 0..h.max(0) {
            self.draw_hline(x, y + dy, w, color)?;
        }
        Ok(())
    }

    /// Midpoint circle outline.
    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: PixelColor) -> Result<()> {
        let mut x = r;
        let mut y = 0;
        let mut d = 1 - r;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.draw_pixel(px, py, color)?;
            }
            y += 1;
            if d < 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
        Ok(())
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: PixelColor) -> Result<()> {
        for dy in -r..=r {
            let mut half = 0;
            while (half + 1) * (half + 1) + dy * dy <= r * r {
                half += 1;
            }
            self.draw_hline(cx - half, cy + dy, 2 * half + 1, color)?;
        }
        Ok(())
    }

    /// Draw a 1bpp bitmap (row-major, MSB first, rows padded to whole bytes).
    /// Only set bits are drawn.
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        w: i32,
        h: i32,
        color: PixelColor,
    ) -> Result<()> {
        let stride = ((w.max(0) + 7) / 8) as usize;
        for row in 0..h.max(0) {
            for col in 0..w.max(0) {
                let idx = row as usize * stride + (col / 8) as usize;
                let Some(byte) = bitmap.get(idx) else {
                    return Ok(());
                };
                if byte & (0x80 >> (col % 8)) != 0 {
                    self.draw_pixel(x + col, y + row, color)?;
                }
            }
        }
        Ok(())
    }
}
