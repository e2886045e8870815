//! Destination for classified events.

use wrist_types::error::Result;
use wrist_types::input::InputEvent;

/// Where the classifier delivers each emitted event.
///
/// The classifier is handed a sink at construction time. A failing sink is
/// logged and the event is treated as lost; the classifier never blocks on
/// it.
pub trait EventSink {
    fn send(&mut self, event: InputEvent) -> Result<()>;
}

impl EventSink for Vec<InputEvent> {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        (**self).send(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        (**self).send(event)
    }
}
