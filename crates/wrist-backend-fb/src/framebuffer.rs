//! Software 1-bit framebuffer.
//!
//! Pixels are stored in the page layout monochrome OLED controllers expect:
//! one byte covers a column of 8 rows, pages run top to bottom. `pages()`
//! can be streamed to a panel as-is.

use wrist_types::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH, Display, PixelColor};
use wrist_types::error::Result;

use crate::font::{self, GLYPH_COLUMNS, GLYPH_ROWS};

const WHITE_RGBA: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const BLACK_RGBA: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Monochrome framebuffer implementing [`Display`].
#[derive(Debug, Clone)]
pub struct MonoFramebuffer {
    width: i32,
    height: i32,
    buffer: Vec<u8>,
    dirty: bool,
    refreshes: u64,
}

impl MonoFramebuffer {
    /// Create a cleared framebuffer. The height is rounded up to whole pages
    /// in storage; drawing is still clipped to `height`.
    pub fn new(width: u32, height: u32) -> Self {
        let pages = height.div_ceil(8);
        Self {
            width: width as i32,
            height: height as i32,
            buffer: vec![0; (width * pages) as usize],
            dirty: true,
            refreshes: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Raw page-layout buffer.
    pub fn pages(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether the pixel at (`x`, `y`) is lit. Out of bounds reads as unlit.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some((idx, bit)) => self.buffer[idx] & bit != 0,
            None => false,
        }
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.buffer.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Frames presented so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Whether anything was drawn since the last refresh.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Expand to row-major RGBA (white on black) for screenshots.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let px = if self.pixel(x, y) { WHITE_RGBA } else { BLACK_RGBA };
                out.extend_from_slice(&px);
            }
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let idx = (x + (y / 8) * self.width) as usize;
        Some((idx, 1 << (y & 7)))
    }

    fn draw_glyph(&mut self, x: i32, y: i32, ch: char, color: PixelColor, size: i32) -> Result<()> {
        let columns = font::glyph(ch);
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..GLYPH_ROWS {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let px = x + col as i32 * size;
                let py = y + row as i32 * size;
                if size == 1 {
                    self.draw_pixel(px, py, color)?;
                } else {
                    self.fill_rect(px, py, size, size, color)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for MonoFramebuffer {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32)
    }
}

impl Display for MonoFramebuffer {
    fn clear(&mut self) -> Result<()> {
        self.buffer.fill(0);
        self.dirty = true;
        Ok(())
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: PixelColor) -> Result<()> {
        let Some((idx, bit)) = self.index(x, y) else {
            return Ok(());
        };
        match color {
            PixelColor::White => self.buffer[idx] |= bit,
            PixelColor::Black => self.buffer[idx] &= !bit,
            PixelColor::Inverse => self.buffer[idx] ^= bit,
        }
        self.dirty = true;
        Ok(())
    }

    /// Text is drawn left to right; `\n` returns to `x` one line down.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: PixelColor, size: u8) -> Result<()> {
        let size = i32::from(size.max(1));
        let (mut cx, mut cy) = (x, y);
        for ch in text.chars() {
            if ch == '\n' {
                cx = x;
                cy += GLYPH_ROWS as i32 * size;
                continue;
            }
            if cx >= self.width {
                continue;
            }
            self.draw_glyph(cx, cy, ch, color, size)?;
            cx += GLYPH_COLUMNS as i32 * size;
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.refreshes += 1;
        self.dirty = false;
        log::trace!("Framebuffer refresh #{}", self.refreshes);
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: PixelColor) -> Result<()> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.draw_pixel(px, py, color)?;
            }
        }
        Ok(())
    }
}
