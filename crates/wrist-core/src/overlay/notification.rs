//! Notification banner.
//!
//! A single slot: a new notification replaces the current one. The banner
//! slides down from above the screen, then stays until its duration runs
//! out or it is dismissed.

use wrist_types::display::{Display, PixelColor};
use wrist_types::error::{Result, WristError};

use crate::app::AppContext;

/// Longest title kept, in characters.
pub const TITLE_MAX_CHARS: usize = 16;
/// Longest body kept, in characters.
pub const BODY_MAX_CHARS: usize = 32;

/// Notification importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

type TapCallback = Box<dyn FnOnce(&mut AppContext)>;

/// A notification request.
pub struct Notification {
    title: String,
    body: Option<String>,
    priority: Priority,
    duration_ms: u64,
    on_tap: Option<TapCallback>,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            priority: Priority::Normal,
            duration_ms: 0,
            on_tap: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Display time; 0 selects the configured default.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Called when the user presses while the banner is showing.
    pub fn on_tap(mut self, f: impl FnOnce(&mut AppContext) + 'static) -> Self {
        self.on_tap = Some(Box::new(f));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn priority_level(&self) -> Priority {
        self.priority
    }

    pub(crate) fn take_on_tap(&mut self) -> Option<TapCallback> {
        self.on_tap.take()
    }
}

fn truncate_chars(s: &mut String, max: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
}

struct Shown {
    notification: Notification,
    shown_at: u64,
    duration_ms: u64,
    y_offset: i32,
}

/// The single notification slot.
pub struct NotificationSlot {
    current: Option<Shown>,
    default_ms: u64,
    slide_ms: u64,
    height: i32,
}

impl NotificationSlot {
    pub fn new(default_ms: u64, slide_ms: u64, height: i32) -> Self {
        Self {
            current: None,
            default_ms,
            slide_ms,
            height,
        }
    }

    /// Show `notification`, replacing any current one.
    ///
    /// An empty title is rejected. Over-long title and body are truncated.
    pub fn show(&mut self, mut notification: Notification, now: u64) -> Result<()> {
        if notification.title.is_empty() {
            return Err(WristError::InvalidArgument(
                "notification title must not be empty".into(),
            ));
        }
        truncate_chars(&mut notification.title, TITLE_MAX_CHARS);
        if let Some(body) = notification.body.as_mut() {
            truncate_chars(body, BODY_MAX_CHARS);
        }
        let duration_ms = if notification.duration_ms == 0 {
            self.default_ms
        } else {
            notification.duration_ms
        };
        log::info!("Notification: {}", notification.title);
        self.current = Some(Shown {
            notification,
            shown_at: now,
            duration_ms,
            y_offset: -self.height,
        });
        Ok(())
    }

    /// Advance the slide-in and auto-dismiss once the duration has passed.
    pub fn tick(&mut self, now: u64) {
        let Some(shown) = self.current.as_mut() else {
            return;
        };
        let elapsed = now.saturating_sub(shown.shown_at);
        shown.y_offset = if elapsed < self.slide_ms {
            -self.height + (i64::from(self.height) * elapsed as i64 / self.slide_ms as i64) as i32
        } else {
            0
        };
        if elapsed > shown.duration_ms {
            log::debug!("Notification expired: {}", shown.notification.title);
            self.current = None;
        }
    }

    /// Remove the current notification, returning it.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take().map(|s| s.notification)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|s| &s.notification)
    }

    /// Vertical offset of the banner; negative while sliding in.
    pub fn y_offset(&self) -> Option<i32> {
        self.current.as_ref().map(|s| s.y_offset)
    }

    pub fn render(&self, display: &mut dyn Display, width: i32) -> Result<()> {
        let Some(shown) = self.current.as_ref() else {
            return Ok(());
        };
        let y = shown.y_offset;
        display.fill_rect(0, y, width, self.height, PixelColor::White)?;
        display.draw_text(2, y + 2, &shown.notification.title, PixelColor::Black, 1)?;
        if shown.notification.priority == Priority::High {
            display.fill_rect(width - 4, y + 2, 2, self.height - 4, PixelColor::Black)?;
        }
        Ok(())
    }
}
