//! Event capture and replay over 8-byte wire frames.
//!
//! A capture file is a plain concatenation of frames, exactly what a serial
//! link would carry, so recordings from hardware replay unchanged.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use wrist_input::{EventSink, FrameReader, FrameWriter};
use wrist_types::error::Result;
use wrist_types::input::InputEvent;

/// Sink that forwards every event and also appends it to a capture.
pub struct Recorder<S, W: Write> {
    inner: S,
    writer: FrameWriter<W>,
    recorded: u64,
}

impl<S: EventSink, W: Write> Recorder<S, W> {
    pub fn new(inner: S, out: W) -> Self {
        Self {
            inner,
            writer: FrameWriter::new(out),
            recorded: 0,
        }
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn finish(mut self) -> Result<(S, W)> {
        self.writer.flush()?;
        Ok((self.inner, self.writer.into_inner()))
    }
}

impl<S: EventSink> Recorder<S, BufWriter<File>> {
    pub fn create(inner: S, path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self::new(inner, BufWriter::new(file)))
    }
}

impl<S: EventSink, W: Write> EventSink for Recorder<S, W> {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        // A failed capture write must not stall live input.
        if let Err(e) = self.writer.write_event(&event) {
            log::warn!("Capture write failed: {e}");
        } else {
            self.recorded += 1;
        }
        self.inner.send(event)
    }
}

/// Feed every frame from `input` into `sink`, sleeping `pace` between
/// events. Stops at end of stream, on a bad frame, or when the sink fails.
///
/// Returns the number of events delivered.
pub fn replay<R: Read, S: EventSink>(input: R, sink: &mut S, pace: Duration) -> usize {
    let mut delivered = 0;
    for event in FrameReader::new(input) {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Replay stopped: {e}");
                break;
            },
        };
        if let Err(e) = sink.send(event) {
            log::info!("Replay stopped: {e}");
            break;
        }
        delivered += 1;
        if !pace.is_zero() {
            thread::sleep(pace);
        }
    }
    delivered
}

/// Replay a capture file on a background thread.
///
/// The file is opened before the thread starts so a missing capture is
/// reported to the caller.
pub fn spawn_replay<S>(path: &Path, mut sink: S, pace: Duration) -> anyhow::Result<JoinHandle<usize>>
where
    S: EventSink + Send + 'static,
{
    let file = File::open(path).with_context(|| format!("opening capture {}", path.display()))?;
    let label = path.display().to_string();
    let handle = thread::Builder::new()
        .name("replay".into())
        .spawn(move || {
            let n = replay(BufReader::new(file), &mut sink, pace);
            log::info!("Replayed {n} events from {label}");
            n
        })?;
    Ok(handle)
}
