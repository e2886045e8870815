//! Shared test utilities for wrist-core tests.
//!
//! Provides a [`RecordingDisplay`] that records every draw call for
//! assertion instead of rasterizing.

use wrist_types::display::{Display, PixelColor};
use wrist_types::error::{Result, WristError};

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    Clear,
    Pixel {
        x: i32,
        y: i32,
        color: PixelColor,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
    HLine {
        x: i32,
        y: i32,
        w: i32,
        color: PixelColor,
    },
    VLine {
        x: i32,
        y: i32,
        h: i32,
    },
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: PixelColor,
    },
    FillRect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: PixelColor,
    },
    Circle {
        cx: i32,
        cy: i32,
        r: i32,
    },
    FillCircle {
        cx: i32,
        cy: i32,
        r: i32,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        color: PixelColor,
        size: u8,
    },
    Bitmap {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    },
    Refresh,
}

/// A display that records all draw calls for test assertions.
pub struct RecordingDisplay {
    pub calls: Vec<DrawCall>,
    /// When set, `refresh` fails with a display error.
    pub fail_refresh: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_refresh: false,
        }
    }

    /// Whether any text call drew exactly `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Whether any text call contains `needle`.
    pub fn has_text_containing(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Index of the first text call drawing `needle`.
    pub fn text_index(&self, needle: &str) -> Option<usize> {
        self.calls
            .iter()
            .position(|c| matches!(c, DrawCall::Text { text, .. } if text == needle))
    }

    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }

    pub fn draw_text_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Text { .. }))
            .count()
    }

    pub fn refresh_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Refresh))
            .count()
    }
}

impl Display for RecordingDisplay {
    fn clear(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Clear);
        Ok(())
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::Pixel { x, y, color });
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: PixelColor, size: u8) -> Result<()> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            color,
            size,
        });
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        if self.fail_refresh {
            return Err(WristError::Display("panel not responding".into()));
        }
        self.calls.push(DrawCall::Refresh);
        Ok(())
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::HLine { x, y, w, color });
        Ok(())
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, _color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::VLine { x, y, h });
        Ok(())
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, _color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::Line { x0, y0, x1, y1 });
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, _color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::Circle { cx, cy, r });
        Ok(())
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, _color: PixelColor) -> Result<()> {
        self.calls.push(DrawCall::FillCircle { cx, cy, r });
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        _bitmap: &[u8],
        w: i32,
        h: i32,
        _color: PixelColor,
    ) -> Result<()> {
        self.calls.push(DrawCall::Bitmap { x, y, w, h });
        Ok(())
    }
}
