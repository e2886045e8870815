//! Raw sensor access.

/// One raw reading of the stick and button lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// Raw X axis ADC value.
    pub x: u16,
    /// Raw Y axis ADC value.
    pub y: u16,
    /// Primary (stick) button is down.
    pub press: bool,
    pub home: bool,
    pub back: bool,
}

impl RawSample {
    /// Stick at rest with no buttons down.
    pub fn at_rest(center_x: u16, center_y: u16) -> Self {
        Self {
            x: center_x,
            y: center_y,
            press: false,
            home: false,
            back: false,
        }
    }
}

/// Hardware (or simulated) stick the classifier polls.
///
/// Implementations read the lines as they are right now. Button lines are
/// reported as logical "down", whatever the electrical polarity.
pub trait InputSource {
    fn read(&mut self) -> RawSample;
}

impl<F: FnMut() -> RawSample> InputSource for F {
    fn read(&mut self) -> RawSample {
        self()
    }
}
