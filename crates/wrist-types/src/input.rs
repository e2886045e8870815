//! Classified input events.
//!
//! The gesture classifier produces these and the runtime consumes them. The
//! runtime never sees raw ADC values or GPIO levels.

use bitflags::bitflags;

/// Upper bound of a normalized axis value. The lower bound is `-AXIS_MAX`.
pub const AXIS_MAX: i8 = 100;

bitflags! {
    /// Button bitmask carried by every [`InputEvent`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// Primary button is held.
        const PRESS = 0x01;
        /// Second press inside the double-press window, reported on release.
        const DOUBLE = 0x02;
        /// Primary button held past the long-press threshold (once per hold).
        const LONG = 0x04;
        /// Auxiliary Home button line.
        const HOME = 0x08;
        /// Auxiliary Back button line.
        const BACK = 0x10;
    }
}

impl Buttons {
    /// Bits that are set in `self` but were clear in `previous`.
    pub fn rising_from(self, previous: Buttons) -> Buttons {
        self & !previous
    }
}

/// Context layer tag: which consumer's input semantics currently apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layer {
    #[default]
    Global,
    TextEditor,
    CsvEditor,
    Modifier,
    MeshCompose,
    MeshInbox,
    /// A value from the wire that this build does not know about.
    Unknown(u8),
}

impl Layer {
    /// Decode a wire value. Unknown codes are preserved, not rejected.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Global,
            1 => Self::TextEditor,
            2 => Self::CsvEditor,
            3 => Self::Modifier,
            4 => Self::MeshCompose,
            5 => Self::MeshInbox,
            other => Self::Unknown(other),
        }
    }

    /// Wire value of this layer.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Global => 0,
            Self::TextEditor => 1,
            Self::CsvEditor => 2,
            Self::Modifier => 3,
            Self::MeshCompose => 4,
            Self::MeshInbox => 5,
            Self::Unknown(v) => v,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// An immutable classified input sample.
///
/// Axis values are always within `-100..=100`. Sequence numbers strictly
/// increase per physical source; consumers may use gaps to detect drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    x: i8,
    y: i8,
    buttons: Buttons,
    layer: Layer,
    seq: u32,
}

impl InputEvent {
    /// Build an event. Out-of-range axis values are clamped.
    pub fn new(x: i8, y: i8, buttons: Buttons, layer: Layer, seq: u32) -> Self {
        Self {
            x: x.clamp(-AXIS_MAX, AXIS_MAX),
            y: y.clamp(-AXIS_MAX, AXIS_MAX),
            buttons,
            layer,
            seq,
        }
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Whether every bit of `mask` is set on this event.
    pub fn has(&self, mask: Buttons) -> bool {
        self.buttons.contains(mask)
    }
}
