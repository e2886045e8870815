//! Status bar -- the strip above the active scene.
//!
//! Left to right: BLE, Wi-Fi and music indicators, the unread notification
//! count, battery, and the clock on the far right.

use wrist_types::display::{Display, PixelColor};
use wrist_types::error::Result;
use wrist_types::status::Status;

const INDICATOR_STEP: i32 = 8;
const BATTERY_X: i32 = 72;
const CLOCK_INSET: i32 = 30;

/// Draw the status bar for `status` across `width` pixels.
pub fn render(display: &mut dyn Display, status: &Status, width: i32, height: i32) -> Result<()> {
    display.fill_rect(0, 0, width, height, PixelColor::Black)?;
    display.draw_text(width - CLOCK_INSET, 1, &status.clock_text(), PixelColor::White, 1)?;

    let mut x = 2;
    let ble = if status.ble_connected { "B" } else { "." };
    display.draw_text(x, 1, ble, PixelColor::White, 1)?;
    x += INDICATOR_STEP;

    if status.wifi_connected {
        display.draw_text(x, 1, "W", PixelColor::White, 1)?;
    }
    x += INDICATOR_STEP;

    if status.music_playing {
        display.draw_text(x, 1, ">", PixelColor::White, 1)?;
    }
    x += INDICATOR_STEP;

    if status.unread_notifications > 0 {
        let count = format!("[{}]", status.unread_notifications);
        display.draw_text(x, 1, &count, PixelColor::White, 1)?;
    }

    if let Some(pct) = status.battery_percent {
        display.draw_text(BATTERY_X, 1, &format!("{}%", pct.min(100)), PixelColor::White, 1)?;
    }

    display.draw_hline(0, height - 1, width, PixelColor::White)
}
