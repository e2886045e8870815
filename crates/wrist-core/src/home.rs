//! Home Menu -- paged icon grid of registered applications.
//!
//! Four columns by two rows per page. The selection is a global index into
//! the registration order; the visible page follows it.

use wrist_types::display::{Display, PixelColor, text_width};
use wrist_types::error::Result;
use wrist_types::input::{Buttons, InputEvent};

use crate::app::ICON_SIZE;
use crate::nav::{Direction, NavInput, NavTiming};
use crate::registry::AppInfo;

pub const GRID_COLS: usize = 4;
pub const GRID_ROWS: usize = 2;
pub const ICONS_PER_PAGE: usize = GRID_COLS * GRID_ROWS;

const CELL_W: i32 = 32;
const CELL_H: i32 = 26;
const NAME_MAX_CHARS: usize = 5;

/// Navigation state for the Home Menu.
#[derive(Debug, Clone)]
pub struct HomeMenu {
    selected: usize,
    nav: NavInput,
}

impl HomeMenu {
    pub fn new(timing: NavTiming) -> Self {
        Self {
            selected: 0,
            nav: NavInput::new(timing),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Page showing the current selection (0-based).
    pub fn page(&self) -> usize {
        self.selected / ICONS_PER_PAGE
    }

    /// Number of pages needed for `app_count` applications.
    pub fn page_count(app_count: usize) -> usize {
        app_count.div_ceil(ICONS_PER_PAGE).max(1)
    }

    /// Move the selection by `step`, wrapping over `count` entries.
    fn step(&mut self, step: i64, count: usize) {
        let next = (self.selected as i64 + step).rem_euclid(count as i64);
        self.selected = next as usize;
    }

    /// Navigate or activate. Returns the index of the application to launch.
    ///
    /// `pressed` holds the buttons that went down with `event`.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        pressed: Buttons,
        now: u64,
        app_count: usize,
    ) -> Option<usize> {
        if app_count == 0 {
            self.selected = 0;
            return None;
        }
        // The registry only grows, but keep the selection valid regardless.
        if self.selected >= app_count {
            self.selected = app_count - 1;
        }

        match self.nav.direction(event, now) {
            Some(Direction::Right) => self.step(1, app_count),
            Some(Direction::Left) => self.step(-1, app_count),
            Some(Direction::Down) => self.step(GRID_COLS as i64, app_count),
            Some(Direction::Up) => self.step(-(GRID_COLS as i64), app_count),
            None => {},
        }

        if self.nav.pressed(pressed, now) {
            log::debug!("Home: activate index {}", self.selected);
            return Some(self.selected);
        }
        None
    }

    /// Draw the grid for the page holding the selection.
    pub fn render(
        &self,
        display: &mut dyn Display,
        apps: &[AppInfo<'_>],
        width: i32,
        top: i32,
    ) -> Result<()> {
        if apps.is_empty() {
            return display.draw_text(10, 30, "No apps", PixelColor::White, 1);
        }

        let page = self.page();
        let start = page * ICONS_PER_PAGE;
        let end = (start + ICONS_PER_PAGE).min(apps.len());
        let start_y = top + 2;

        for (slot, app) in apps[start..end].iter().enumerate() {
            let col = (slot % GRID_COLS) as i32;
            let row = (slot / GRID_COLS) as i32;
            let x = col * CELL_W;
            let y = start_y + row * CELL_H;
            let icon_x = x + (CELL_W - ICON_SIZE) / 2;
            let icon_y = y + 2;

            match app.icon {
                Some(bitmap) => {
                    display.draw_bitmap(icon_x, icon_y, bitmap, ICON_SIZE, ICON_SIZE, PixelColor::White)?
                },
                None => display.draw_rect(icon_x, icon_y, ICON_SIZE, ICON_SIZE, PixelColor::White)?,
            }

            let name: String = app.name.chars().take(NAME_MAX_CHARS).collect();
            let name_w = text_width(&name, 1);
            let name_x = x + (CELL_W - name_w) / 2;
            display.draw_text(name_x, icon_y + ICON_SIZE + 2, &name, PixelColor::White, 1)?;

            if start + slot == self.selected {
                display.draw_rect(x + 1, y, CELL_W - 2, CELL_H, PixelColor::White)?;
            }
        }

        let pages = Self::page_count(apps.len());
        if pages > 1 {
            let mark = format!("{}/{}", page + 1, pages);
            let mark_x = width - text_width(&mark, 1) - 1;
            display.draw_text(mark_x, start_y + GRID_ROWS as i32 * CELL_H, &mark, PixelColor::White, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawCall, RecordingDisplay};
    use wrist_types::input::{Buttons, Layer};

    fn menu() -> HomeMenu {
        HomeMenu::new(NavTiming {
            threshold: 30,
            nav_repeat_ms: 150,
            press_debounce_ms: 300,
        })
    }

    fn stick(x: i8, y: i8) -> InputEvent {
        InputEvent::new(x, y, Buttons::empty(), Layer::Global, 0)
    }

    fn press() -> InputEvent {
        InputEvent::new(0, 0, Buttons::PRESS, Layer::Global, 0)
    }

    fn infos(names: &[&'static str]) -> Vec<AppInfo<'static>> {
        names
            .iter()
            .map(|&n| AppInfo {
                id: n,
                name: n,
                icon: None,
            })
            .collect()
    }

    #[test]
    fn right_and_left_wrap() {
        let mut m = menu();
        m.handle_input(&stick(-100, 0), Buttons::empty(), 0, 3);
        assert_eq!(m.selected(), 2);
        m.handle_input(&stick(100, 0), Buttons::empty(), 200, 3);
        assert_eq!(m.selected(), 0);
    }

    #[test]
    fn vertical_moves_by_a_row() {
        let mut m = menu();
        m.handle_input(&stick(0, -100), Buttons::empty(), 0, 10);
        assert_eq!(m.selected(), 4);
        m.handle_input(&stick(0, -100), Buttons::empty(), 200, 10);
        assert_eq!(m.selected(), 8);
        m.handle_input(&stick(0, -100), Buttons::empty(), 400, 10);
        assert_eq!(m.selected(), 2);
        m.handle_input(&stick(0, 100), Buttons::empty(), 600, 10);
        assert_eq!(m.selected(), 8);
    }

    #[test]
    fn sustained_deflection_is_rate_limited() {
        let mut m = menu();
        m.handle_input(&stick(100, 0), Buttons::empty(), 0, 8);
        m.handle_input(&stick(100, 0), Buttons::empty(), 100, 8);
        m.handle_input(&stick(100, 0), Buttons::empty(), 150, 8);
        assert_eq!(m.selected(), 1);
        m.handle_input(&stick(100, 0), Buttons::empty(), 151, 8);
        assert_eq!(m.selected(), 2);
    }

    #[test]
    fn press_returns_selection_and_debounces() {
        let mut m = menu();
        m.handle_input(&stick(100, 0), Buttons::empty(), 0, 4);
        assert_eq!(m.handle_input(&press(), Buttons::PRESS, 10, 4), Some(1));
        assert_eq!(m.handle_input(&press(), Buttons::PRESS, 100, 4), None);
        assert_eq!(m.handle_input(&press(), Buttons::PRESS, 400, 4), Some(1));
    }

    #[test]
    fn held_press_activates_once() {
        let mut m = menu();
        assert_eq!(m.handle_input(&press(), Buttons::PRESS, 0, 4), Some(0));
        for t in [100, 400, 800] {
            assert_eq!(m.handle_input(&press(), Buttons::empty(), t, 4), None);
        }
    }

    #[test]
    fn empty_menu_never_activates() {
        let mut m = menu();
        assert_eq!(m.handle_input(&press(), Buttons::PRESS, 0, 0), None);
        let mut d = RecordingDisplay::new();
        m.render(&mut d, &[], 128, 10).unwrap();
        assert!(d.has_text("No apps"));
    }

    #[test]
    fn names_truncated_and_default_icon_boxed() {
        let m = menu();
        let mut d = RecordingDisplay::new();
        m.render(&mut d, &infos(&["Settings", "Music"]), 128, 10).unwrap();
        assert!(d.has_text("Setti"));
        assert!(d.has_text("Music"));
        let boxes = d
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Rect { w: 16, h: 16, .. }))
            .count();
        assert_eq!(boxes, 2);
        // Selection highlight around the first cell.
        assert!(d.calls.contains(&DrawCall::Rect {
            x: 1,
            y: 12,
            w: 30,
            h: 26,
            color: PixelColor::White,
        }));
    }

    #[test]
    fn icon_bitmap_drawn_when_supplied() {
        let icon = [0xFFu8; 32];
        let apps = [AppInfo {
            id: "a",
            name: "A",
            icon: Some(&icon),
        }];
        let mut d = RecordingDisplay::new();
        menu().render(&mut d, &apps, 128, 10).unwrap();
        assert!(d.calls.contains(&DrawCall::Bitmap {
            x: 8,
            y: 14,
            w: 16,
            h: 16,
        }));
    }

    #[test]
    fn second_page_follows_selection() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let mut m = menu();
        m.handle_input(&stick(-100, 0), Buttons::empty(), 0, names.len());
        assert_eq!(m.selected(), 8);
        assert_eq!(m.page(), 1);
        let mut d = RecordingDisplay::new();
        m.render(&mut d, &infos(&names), 128, 10).unwrap();
        assert!(d.has_text("i"));
        assert!(!d.has_text("a"));
        assert!(d.has_text("2/2"));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(HomeMenu::page_count(0), 1);
        assert_eq!(HomeMenu::page_count(8), 1);
        assert_eq!(HomeMenu::page_count(9), 2);
    }
}
