//! In-process Input Event Channel.
//!
//! A single-consumer queue between the classifier (any thread) and the
//! runtime loop. The receiving side enforces the sequence contract: events
//! arrive in order, gaps are counted as drops, and anything at or behind the
//! last accepted sequence number is discarded as stale.

use std::sync::mpsc;

use wrist_types::error::{Result, WristError};
use wrist_types::input::InputEvent;

use crate::sink::EventSink;

/// Pull side of an event transport as seen by the runtime loop.
pub trait EventSource {
    /// The next pending event, or `None` if nothing is waiting. Never blocks.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        EventSender { tx },
        EventReceiver {
            rx,
            tracker: SequenceTracker::default(),
            disconnected: false,
        },
    )
}

/// Producer half. Cheap to clone; usable as a classifier sink.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<InputEvent>,
}

impl EventSink for EventSender {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| WristError::Channel("event receiver disconnected".into()))
    }
}

/// Consumer half, owned by the runtime loop.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<InputEvent>,
    tracker: SequenceTracker,
    disconnected: bool,
}

impl EventReceiver {
    /// Next in-order event, skipping stale ones. Never blocks.
    pub fn try_recv(&mut self) -> Option<InputEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if self.tracker.accept(event.seq()) {
                        return Some(event);
                    }
                },
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        log::warn!("Input event channel disconnected");
                        self.disconnected = true;
                    }
                    return None;
                },
            }
        }
    }

    /// Whether every sender has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    pub fn stats(&self) -> &SequenceTracker {
        &self.tracker
    }
}

impl EventSource for EventReceiver {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.try_recv()
    }
}

/// Sequence-number bookkeeping for one physical source.
///
/// Comparison uses serial-number arithmetic so the counter may wrap past
/// `u32::MAX` without every later event looking stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceTracker {
    last: Option<u32>,
    accepted: u64,
    dropped: u64,
    stale: u64,
}

impl SequenceTracker {
    /// Record `seq`. Returns `false` if the event is stale and must be skipped.
    pub fn accept(&mut self, seq: u32) -> bool {
        if let Some(last) = self.last {
            let distance = seq.wrapping_sub(last);
            if distance == 0 || distance > u32::MAX / 2 {
                self.stale += 1;
                log::debug!("Discarding stale input event seq={seq} (last={last})");
                return false;
            }
            let gap = distance - 1;
            if gap > 0 {
                self.dropped += u64::from(gap);
                log::warn!("Input events lost: {gap} missing before seq={seq}");
            }
        }
        self.last = Some(seq);
        self.accepted += 1;
        true
    }

    /// Last accepted sequence number.
    pub fn last_seq(&self) -> Option<u32> {
        self.last
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Events inferred lost from sequence gaps.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Duplicate or out-of-order events that were skipped.
    pub fn stale(&self) -> u64 {
        self.stale
    }
}
