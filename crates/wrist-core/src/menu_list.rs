//! Scrolling list widget for application screens.

use wrist_types::display::{Display, PixelColor};
use wrist_types::error::Result;
use wrist_types::input::{Buttons, InputEvent};

use crate::nav::{Direction, NavInput, NavTiming};

/// Row height in pixels.
pub const ITEM_HEIGHT: i32 = 10;
/// Rows kept on screen when scrolling.
pub const VISIBLE_ITEMS: usize = 5;

const ITEM_ICON_SIZE: i32 = 8;

/// One row of a [`MenuList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    /// Optional 8x8 1bpp icon drawn before the label.
    pub icon: Option<[u8; 8]>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: [u8; 8]) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Selection and scroll state for a vertical list.
#[derive(Debug, Clone)]
pub struct MenuList {
    items: Vec<MenuItem>,
    selected: usize,
    scroll_offset: usize,
    nav: NavInput,
}

impl MenuList {
    pub fn new(items: Vec<MenuItem>, timing: NavTiming) -> Self {
        Self {
            items,
            selected: 0,
            scroll_offset: 0,
            nav: NavInput::new(timing),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Replace the items, keeping the selection in range.
    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.select(self.selected);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Select `index`, clamped to the last item.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + VISIBLE_ITEMS {
            self.scroll_offset = self.selected + 1 - VISIBLE_ITEMS;
        }
    }

    /// Move the selection (no wrap-around) or activate it.
    ///
    /// Returns the index of the activated item. `pressed` holds the buttons
    /// that went down with `event`.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        pressed: Buttons,
        now: u64,
    ) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        match self.nav.vertical(event, now) {
            Some(Direction::Down) if self.selected + 1 < self.items.len() => self.selected += 1,
            Some(Direction::Up) if self.selected > 0 => self.selected -= 1,
            _ => {},
        }
        self.follow_selection();
        self.nav.pressed(pressed, now).then_some(self.selected)
    }

    /// Draw the list into the given box, with a scroll bar when it overflows.
    pub fn draw(&self, display: &mut dyn Display, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        let rows = (h / ITEM_HEIGHT).max(0) as usize;
        for (row, (index, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(rows)
            .enumerate()
        {
            let item_y = y + row as i32 * ITEM_HEIGHT;
            let color = if index == self.selected {
                display.fill_rect(x, item_y, w, ITEM_HEIGHT, PixelColor::White)?;
                PixelColor::Black
            } else {
                PixelColor::White
            };
            let mut text_x = x + 2;
            if let Some(icon) = &item.icon {
                display.draw_bitmap(text_x, item_y + 1, icon, ITEM_ICON_SIZE, ITEM_ICON_SIZE, color)?;
                text_x += ITEM_ICON_SIZE + 2;
            }
            display.draw_text(text_x, item_y + 1, &item.label, color, 1)?;
        }

        let count = self.items.len();
        if count > rows && rows > 0 {
            let bar_h = h * rows as i32 / count as i32;
            let scroll = self.scroll_offset.min(count - rows) as i32;
            let bar_y = y + (h - bar_h) * scroll / (count - rows) as i32;
            display.fill_rect(x + w - 2, bar_y, 2, bar_h, PixelColor::White)?;
        }
        Ok(())
    }
}
