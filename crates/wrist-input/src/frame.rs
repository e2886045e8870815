//! Byte-stream framing for serial-style transports.

use std::io::{self, Read, Write};

use wrist_types::error::{Result, WristError};
use wrist_types::input::InputEvent;
use wrist_types::wire::{self, FRAME_LEN};

use crate::sink::EventSink;

/// Reads consecutive 8-byte frames from a byte pipe.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next event.
    ///
    /// Returns `Ok(None)` on a clean end of stream at a frame boundary. A
    /// stream that ends mid-frame is a [`WristError::Wire`] error.
    pub fn read_event(&mut self) -> Result<Option<InputEvent>> {
        let mut buf = [0u8; FRAME_LEN];
        let mut filled = 0;
        while filled < FRAME_LEN {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(None),
            FRAME_LEN => wire::decode(&buf).map(Some),
            partial => Err(WristError::Wire(format!(
                "stream ended mid-frame after {partial} of {FRAME_LEN} bytes"
            ))),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<InputEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_event().transpose()
    }
}

/// Writes events as 8-byte frames. Usable directly as a classifier sink.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_event(&mut self, event: &InputEvent) -> Result<()> {
        self.inner.write_all(&wire::encode(event))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> EventSink for FrameWriter<W> {
    fn send(&mut self, event: InputEvent) -> Result<()> {
        self.write_event(&event)
    }
}
