//! Modal dialog.

use wrist_types::display::{Display, PixelColor};
use wrist_types::error::{Result, WristError};
use wrist_types::input::{Buttons, InputEvent};

use crate::app::AppContext;
use crate::nav::{Direction, NavInput, NavTiming};

/// Most buttons a dialog can carry.
pub const MAX_BUTTONS: usize = 3;

const BOX_W: i32 = 100;
const BOX_H: i32 = 40;

type ClickCallback = Box<dyn FnOnce(&mut AppContext)>;
type CloseCallback = Box<dyn FnOnce(DialogOutcome, &mut AppContext)>;

/// How a dialog ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The button at this index was pressed.
    Selected(usize),
    /// Closed without a selection (Home/Back, replacement, explicit close).
    Dismissed,
}

struct DialogButton {
    label: String,
    on_click: Option<ClickCallback>,
}

/// A modal dialog request.
pub struct Dialog {
    title: String,
    message: String,
    buttons: Vec<DialogButton>,
    default_button: usize,
    on_close: Option<CloseCallback>,
}

impl Dialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: Vec::new(),
            default_button: 0,
            on_close: None,
        }
    }

    /// Add a button whose callback runs when it is pressed.
    pub fn button(
        mut self,
        label: impl Into<String>,
        on_click: impl FnOnce(&mut AppContext) + 'static,
    ) -> Self {
        self.buttons.push(DialogButton {
            label: label.into(),
            on_click: Some(Box::new(on_click)),
        });
        self
    }

    /// Add a button that only closes the dialog.
    pub fn plain_button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(DialogButton {
            label: label.into(),
            on_click: None,
        });
        self
    }

    pub fn default_button(mut self, index: usize) -> Self {
        self.default_button = index;
        self
    }

    /// Completion callback, invoked exactly once however the dialog ends.
    pub fn on_close(mut self, f: impl FnOnce(DialogOutcome, &mut AppContext) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn button_labels(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.label.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.buttons.is_empty() || self.buttons.len() > MAX_BUTTONS {
            return Err(WristError::InvalidArgument(format!(
                "dialog needs 1..={MAX_BUTTONS} buttons, got {}",
                self.buttons.len()
            )));
        }
        if self.default_button >= self.buttons.len() {
            return Err(WristError::InvalidArgument(format!(
                "default button {} out of range",
                self.default_button
            )));
        }
        Ok(())
    }
}

/// An active dialog and its selection state.
pub struct DialogState {
    dialog: Dialog,
    selected: usize,
    nav: NavInput,
}

impl DialogState {
    /// Activate `dialog`. Fails if it has no buttons or a bad default.
    pub fn open(dialog: Dialog, timing: NavTiming) -> Result<Self> {
        dialog.validate()?;
        let selected = dialog.default_button;
        Ok(Self {
            dialog,
            selected,
            nav: NavInput::new(timing),
        })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Move the selection or activate it. Returns the pressed index.
    ///
    /// `pressed` holds the buttons that went down with `event`.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        pressed: Buttons,
        now: u64,
    ) -> Option<usize> {
        let count = self.dialog.buttons.len();
        match self.nav.direction(event, now) {
            Some(Direction::Right) => self.selected = (self.selected + 1) % count,
            Some(Direction::Left) => self.selected = (self.selected + count - 1) % count,
            _ => {},
        }
        self.nav.pressed(pressed, now).then_some(self.selected)
    }

    /// End the dialog, running the button callback (if selected) and then
    /// the completion callback.
    pub fn finish(mut self, outcome: DialogOutcome, ctx: &mut AppContext) {
        log::debug!("Dialog '{}' closed: {outcome:?}", self.dialog.title);
        if let DialogOutcome::Selected(i) = outcome {
            if let Some(cb) = self.dialog.buttons.get_mut(i).and_then(|b| b.on_click.take()) {
                cb(ctx);
            }
        }
        if let Some(cb) = self.dialog.on_close.take() {
            cb(outcome, ctx);
        }
    }

    pub fn render(&self, display: &mut dyn Display, width: i32, height: i32) -> Result<()> {
        let x = (width - BOX_W) / 2;
        let y = (height - BOX_H) / 2;
        display.fill_rect(x, y, BOX_W, BOX_H, PixelColor::Black)?;
        display.draw_rect(x, y, BOX_W, BOX_H, PixelColor::White)?;
        display.draw_text(x + 4, y + 2, &self.dialog.title, PixelColor::White, 1)?;
        if !self.dialog.message.is_empty() {
            display.draw_text(x + 4, y + 12, &self.dialog.message, PixelColor::White, 1)?;
        }

        let btn_y = y + BOX_H - 12;
        let btn_w = BOX_W / self.dialog.buttons.len() as i32;
        for (i, button) in self.dialog.buttons.iter().enumerate() {
            let btn_x = x + i as i32 * btn_w;
            if i == self.selected {
                display.fill_rect(btn_x + 2, btn_y, btn_w - 4, 10, PixelColor::White)?;
                display.draw_text(btn_x + 4, btn_y + 1, &button.label, PixelColor::Black, 1)?;
            } else {
                display.draw_text(btn_x + 4, btn_y + 1, &button.label, PixelColor::White, 1)?;
            }
        }
        Ok(())
    }
}
