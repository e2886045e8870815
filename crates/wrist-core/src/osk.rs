//! On-screen keyboard.
//!
//! A grid keyboard driven by the stick: deflection moves a key cursor, the
//! primary button activates the key under it. Two keys are sentinels:
//! `<` deletes the last character and `>` confirms.

use wrist_types::display::{Display, GLYPH_HEIGHT, PixelColor};
use wrist_types::error::Result;
use wrist_types::input::{Buttons, InputEvent};

use crate::app::AppContext;
use crate::nav::{Direction, NavInput, NavTiming};

/// Key rows, top to bottom.
pub const KEY_ROWS: [&str; 4] = ["1234567890", "QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM <>"];

const BACKSPACE: char = '<';
const CONFIRM: char = '>';
const MASK: char = '*';

/// Starting key: row 1, column 4 ('T').
const START_ROW: usize = 1;
const START_COL: usize = 4;

/// How a keyboard session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OskOutcome {
    Confirmed(String),
    /// Canceled by Home/Back or replaced. Carries no text.
    Cancelled,
}

type OskCallback = Box<dyn FnOnce(OskOutcome, &mut AppContext)>;

/// Request to open the keyboard. The completion callback is mandatory.
pub struct OskRequest {
    title: String,
    initial_text: String,
    max_length: usize,
    password: bool,
    callback: OskCallback,
}

impl OskRequest {
    pub fn new(
        title: impl Into<String>,
        callback: impl FnOnce(OskOutcome, &mut AppContext) + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            initial_text: String::new(),
            max_length: 0,
            password: false,
            callback: Box::new(callback),
        }
    }

    pub fn initial_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }

    /// Buffer cap in characters; 0 selects the configured default.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        self
    }

    pub fn password(mut self, on: bool) -> Self {
        self.password = on;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Result of feeding one event to the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OskInput {
    Editing,
    Confirmed,
}

/// Cursor and buffer state of an open keyboard.
#[derive(Debug)]
pub struct OskState {
    title: String,
    buffer: String,
    max_length: usize,
    password: bool,
    row: usize,
    col: usize,
    visible_chars: usize,
    nav: NavInput,
}

impl OskState {
    /// Open with `max_length` capped at `cap`. Initial text beyond the cap
    /// is cut off.
    pub fn new(
        title: &str,
        initial_text: &str,
        max_length: usize,
        password: bool,
        cap: usize,
        visible_chars: usize,
        timing: NavTiming,
    ) -> Self {
        let max_length = if max_length == 0 {
            cap
        } else {
            max_length.min(cap)
        };
        Self {
            title: title.to_string(),
            buffer: initial_text.chars().take(max_length).collect(),
            max_length,
            password,
            row: START_ROW,
            col: START_COL,
            visible_chars: visible_chars.max(1),
            nav: NavInput::new(timing),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Grid cursor as (row, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn selected_key(&self) -> char {
        KEY_ROWS[self.row]
            .chars()
            .nth(self.col)
            .unwrap_or(CONFIRM)
    }

    fn row_len(row: usize) -> usize {
        KEY_ROWS[row].len()
    }

    /// Move the key cursor one cell. Horizontal moves wrap within the row;
    /// vertical moves wrap between rows and clamp the column.
    pub fn move_cursor(&mut self, dir: Direction) {
        let rows = KEY_ROWS.len();
        match dir {
            Direction::Right => self.col = (self.col + 1) % Self::row_len(self.row),
            Direction::Left => {
                let len = Self::row_len(self.row);
                self.col = (self.col + len - 1) % len;
            },
            Direction::Up => self.row = (self.row + rows - 1) % rows,
            Direction::Down => self.row = (self.row + 1) % rows,
        }
        self.col = self.col.min(Self::row_len(self.row) - 1);
    }

    /// Activate the selected key.
    pub fn activate(&mut self) -> OskInput {
        match self.selected_key() {
            BACKSPACE => {
                self.buffer.pop();
                OskInput::Editing
            },
            CONFIRM => OskInput::Confirmed,
            c => {
                if self.len() < self.max_length {
                    self.buffer.push(c);
                }
                OskInput::Editing
            },
        }
    }

    /// Move the key cursor, then activate the key if the primary button is in
    /// `pressed`, the buttons that went down with `event`.
    pub fn handle_input(&mut self, event: &InputEvent, pressed: Buttons, now: u64) -> OskInput {
        if let Some(dir) = self.nav.direction(event, now) {
            self.move_cursor(dir);
        }
        if self.nav.pressed(pressed, now) {
            return self.activate();
        }
        OskInput::Editing
    }

    /// Text shown in the entry field.
    ///
    /// Password mode shows one mask character per buffered character. Long
    /// text scrolls so the end stays visible with room for the next one.
    pub fn visible_text(&self) -> String {
        let len = self.len();
        if self.password {
            return std::iter::repeat_n(MASK, len.min(self.visible_chars)).collect();
        }
        let window = self.visible_chars.saturating_sub(1).max(1);
        let skip = len.saturating_sub(window);
        self.buffer.chars().skip(skip).collect()
    }

    /// Consume the state, yielding the final text.
    pub fn into_text(self) -> String {
        self.buffer
    }

    /// Draw over the content area starting at `top`.
    pub fn render(&self, display: &mut dyn Display, top: i32, width: i32, height: i32) -> Result<()> {
        display.fill_rect(0, top, width, height - top, PixelColor::Black)?;
        display.draw_text(2, top + 1, &self.title, PixelColor::White, 1)?;

        let field_y = top + GLYPH_HEIGHT + 1;
        display.draw_rect(0, field_y, width, 11, PixelColor::White)?;
        display.draw_text(2, field_y + 2, &self.visible_text(), PixelColor::White, 1)?;

        let keys_y = field_y + 11;
        let key_h = ((height - keys_y) / KEY_ROWS.len() as i32).max(1);
        for (row, keys) in KEY_ROWS.iter().enumerate() {
            let key_w = width / keys.len() as i32;
            let ky = keys_y + row as i32 * key_h;
            for (col, key) in keys.chars().enumerate() {
                let kx = col as i32 * key_w;
                let mut buf = [0u8; 4];
                let label = key.encode_utf8(&mut buf);
                if row == self.row && col == self.col {
                    display.fill_rect(kx, ky, key_w, key_h, PixelColor::White)?;
                    display.draw_text(kx + 2, ky, label, PixelColor::Black, 1)?;
                } else {
                    display.draw_text(kx + 2, ky, label, PixelColor::White, 1)?;
                }
            }
        }
        Ok(())
    }
}

/// An open keyboard together with its owner's callback.
pub struct ActiveOsk {
    state: OskState,
    callback: OskCallback,
}

impl ActiveOsk {
    pub fn open(request: OskRequest, cap: usize, visible_chars: usize, timing: NavTiming) -> Self {
        let state = OskState::new(
            &request.title,
            &request.initial_text,
            request.max_length,
            request.password,
            cap,
            visible_chars,
            timing,
        );
        Self {
            state,
            callback: request.callback,
        }
    }

    pub fn state(&self) -> &OskState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut OskState {
        &mut self.state
    }

    /// Close with the buffer contents.
    pub fn confirm(self, ctx: &mut AppContext) {
        let text = self.state.into_text();
        log::debug!("OSK confirmed ({} chars)", text.chars().count());
        (self.callback)(OskOutcome::Confirmed(text), ctx);
    }

    /// Close without a result.
    pub fn cancel(self, ctx: &mut AppContext) {
        log::debug!("OSK cancelled");
        (self.callback)(OskOutcome::Cancelled, ctx);
    }
}
