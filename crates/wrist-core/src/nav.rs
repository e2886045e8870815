//! Joystick navigation helpers shared by the menu, dialog and keyboard.
//!
//! Stick deflection is level-triggered, so every consumer rate-limits it
//! with a [`RepeatGate`]. The primary button activates on its rising edge
//! only, then passes through a debounce gate.

use wrist_types::input::{Buttons, InputEvent};

/// A navigation step decoded from stick deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Decode the dominant direction past `threshold`.
    ///
    /// Horizontal wins over vertical. Positive Y is up.
    pub fn from_event(event: &InputEvent, threshold: i8) -> Option<Self> {
        let (x, y) = (event.x(), event.y());
        if x > threshold {
            Some(Self::Right)
        } else if x < -threshold {
            Some(Self::Left)
        } else if y > threshold {
            Some(Self::Up)
        } else if y < -threshold {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// Allows an action at most once per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatGate {
    interval_ms: u64,
    last: Option<u64>,
}

impl RepeatGate {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    /// Whether more than the interval has passed since the last firing.
    pub fn ready(&self, now: u64) -> bool {
        self.last
            .is_none_or(|last| now.saturating_sub(last) > self.interval_ms)
    }

    pub fn fire(&mut self, now: u64) {
        self.last = Some(now);
    }

    /// Fire if ready. Returns whether it fired.
    pub fn try_fire(&mut self, now: u64) -> bool {
        if self.ready(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }
}

/// Threshold and rate limits for one navigable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTiming {
    pub threshold: i8,
    pub nav_repeat_ms: u64,
    pub press_debounce_ms: u64,
}

/// Rate-limited stick and button decoding for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavInput {
    threshold: i8,
    nav: RepeatGate,
    press: RepeatGate,
}

impl NavInput {
    pub fn new(timing: NavTiming) -> Self {
        Self {
            threshold: timing.threshold,
            nav: RepeatGate::new(timing.nav_repeat_ms),
            press: RepeatGate::new(timing.press_debounce_ms),
        }
    }

    /// Direction to move now, if the stick is deflected and the repeat
    /// interval has passed.
    pub fn direction(&mut self, event: &InputEvent, now: u64) -> Option<Direction> {
        if !self.nav.ready(now) {
            return None;
        }
        let dir = Direction::from_event(event, self.threshold)?;
        self.nav.fire(now);
        Some(dir)
    }

    /// Like [`direction`](Self::direction) but only for the vertical axis.
    pub fn vertical(&mut self, event: &InputEvent, now: u64) -> Option<Direction> {
        if !self.nav.ready(now) {
            return None;
        }
        let y = event.y();
        let dir = if y < -self.threshold {
            Direction::Down
        } else if y > self.threshold {
            Direction::Up
        } else {
            return None;
        };
        self.nav.fire(now);
        Some(dir)
    }

    /// Whether the primary button activates now.
    ///
    /// `pressed` is the set of buttons that went down with this event. A held
    /// button never activates twice, so a surface opened by one press is not
    /// activated by the keep-alive samples of the same hold.
    pub fn pressed(&mut self, pressed: Buttons, now: u64) -> bool {
        pressed.contains(Buttons::PRESS) && self.press.try_fire(now)
    }
}
