//! Input pipeline for the wrist UI runtime.
//!
//! Raw stick and button levels enter through an [`InputSource`], the
//! [`GestureClassifier`] turns them into [`InputEvent`]s and hands each
//! emission to an [`EventSink`]. The runtime side pulls events back out of
//! an [`EventSource`], normally the receiving end of [`channel`].
//! [`FrameWriter`] and [`FrameReader`] carry the same events over a byte
//! pipe (serial link, capture file).
//!
//! [`InputEvent`]: wrist_types::input::InputEvent

pub mod axis;
pub mod channel;
pub mod classifier;
pub mod frame;
pub mod sink;
pub mod source;

pub use channel::{EventReceiver, EventSender, EventSource, channel};
pub use classifier::GestureClassifier;
pub use frame::{FrameReader, FrameWriter};
pub use sink::EventSink;
pub use source::{InputSource, RawSample};
