//! Canonical 8-byte wire layout for [`InputEvent`].
//!
//! ```text
//! offset  size  field
//!      0     1  x       (i8, -100..=100)
//!      1     1  y       (i8, -100..=100)
//!      2     1  buttons (bit0 press, bit1 double, bit2 long, bit3 home, bit4 back)
//!      3     1  layer
//!      4     4  seq     (u32, little-endian)
//! ```

use crate::error::{Result, WristError};
use crate::input::{Buttons, InputEvent, Layer};

/// Size of one encoded event.
pub const FRAME_LEN: usize = 8;

/// Encode an event into its wire frame.
pub fn encode(event: &InputEvent) -> [u8; FRAME_LEN] {
    let seq = event.seq().to_le_bytes();
    [
        event.x() as u8,
        event.y() as u8,
        event.buttons().bits(),
        event.layer().as_u8(),
        seq[0],
        seq[1],
        seq[2],
        seq[3],
    ]
}

/// Decode a wire frame.
///
/// Only the first [`FRAME_LEN`] bytes are read. Axis values outside the
/// normalized range are clamped and unknown button bits are dropped, so a
/// noisy link never produces an out-of-contract event.
pub fn decode(frame: &[u8]) -> Result<InputEvent> {
    if frame.len() < FRAME_LEN {
        return Err(WristError::Wire(format!(
            "frame too short: expected {FRAME_LEN} bytes, got {}",
            frame.len()
        )));
    }
    let seq = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
    Ok(InputEvent::new(
        frame[0] as i8,
        frame[1] as i8,
        Buttons::from_bits_truncate(frame[2]),
        Layer::from_u8(frame[3]),
        seq,
    ))
}
