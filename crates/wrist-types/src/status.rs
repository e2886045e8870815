//! System status record shown in the status bar.
//!
//! Other subsystems (connectivity, battery, media, RTC) write this record;
//! the status bar only reads it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub ble_connected: bool,
    pub wifi_connected: bool,
    /// Signal strength in dBm.
    pub wifi_rssi: i8,
    /// Battery charge 0-100, or `None` when unavailable.
    pub battery_percent: Option<u8>,
    pub music_playing: bool,
    pub unread_notifications: u8,
    pub hour: u8,
    pub minute: u8,
}

impl Status {
    /// `HH:MM` clock text.
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_quiet() {
        let s = Status::default();
        assert!(!s.ble_connected);
        assert!(!s.wifi_connected);
        assert_eq!(s.battery_percent, None);
        assert_eq!(s.unread_notifications, 0);
    }

    #[test]
    fn clock_text_is_zero_padded() {
        let s = Status {
            hour: 7,
            minute: 5,
            ..Status::default()
        };
        assert_eq!(s.clock_text(), "07:05");
    }
}
