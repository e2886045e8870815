//! Runtime configuration loaded from TOML.
//!
//! Every field has a default matching the reference hardware, so an empty
//! file (or no file at all) yields a working configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WristError};

/// Top-level configuration (`wrist.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WristConfig {
    pub classifier: ClassifierConfig,
    pub ui: UiConfig,
}

/// Gesture classifier calibration and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Largest raw ADC value (12-bit ADC: 4095).
    pub raw_max: u16,
    /// Calibrated raw value at rest, X axis.
    pub center_x: u16,
    /// Calibrated raw value at rest, Y axis.
    pub center_y: u16,
    /// Raw counts around center treated as zero.
    pub dead_zone: u16,
    pub invert_x: bool,
    pub invert_y: bool,
    pub sample_rate_hz: u32,
    /// Max gap between two down-edges that counts as a double press.
    pub double_press_ms: u64,
    /// Hold time after which the long-press bit fires once.
    pub long_press_ms: u64,
    /// Axis change (normalized units) that must be exceeded to emit.
    pub hysteresis: u8,
    /// Emit an unchanged event after this long without any emission.
    pub keepalive_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            raw_max: 4095,
            center_x: 2048,
            center_y: 2048,
            dead_zone: 164,
            invert_x: false,
            invert_y: true,
            sample_rate_hz: 100,
            double_press_ms: 300,
            long_press_ms: 700,
            hysteresis: 2,
            keepalive_ms: 100,
        }
    }
}

impl ClassifierConfig {
    /// Sampling period derived from `sample_rate_hz`.
    pub fn sample_period_ms(&self) -> u64 {
        1000 / u64::from(self.sample_rate_hz.max(1))
    }
}

/// Scene, overlay and widget timing and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub status_bar_height: i32,
    pub notify_height: i32,
    /// Axis deflection that counts as a navigation step.
    pub nav_threshold: i8,
    pub menu_nav_repeat_ms: u64,
    pub menu_press_debounce_ms: u64,
    pub dialog_nav_repeat_ms: u64,
    pub dialog_press_debounce_ms: u64,
    pub osk_nav_repeat_ms: u64,
    pub osk_press_debounce_ms: u64,
    /// OSK buffer cap used when a request does not give one.
    pub osk_max_length: usize,
    /// Characters of the OSK text field visible at once.
    pub osk_visible_chars: usize,
    pub notify_default_ms: u64,
    pub notify_slide_ms: u64,
    pub scene_capacity: usize,
    pub app_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_width: crate::display::DISPLAY_WIDTH,
            screen_height: crate::display::DISPLAY_HEIGHT,
            status_bar_height: 10,
            notify_height: 12,
            nav_threshold: 30,
            menu_nav_repeat_ms: 150,
            menu_press_debounce_ms: 300,
            dialog_nav_repeat_ms: 150,
            dialog_press_debounce_ms: 300,
            osk_nav_repeat_ms: 120,
            osk_press_debounce_ms: 200,
            osk_max_length: 127,
            osk_visible_chars: 18,
            notify_default_ms: 3000,
            notify_slide_ms: 200,
            scene_capacity: 8,
            app_capacity: 16,
        }
    }
}

impl Default for WristConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl WristConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the runtime cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        if c.sample_rate_hz == 0 {
            return Err(WristError::InvalidArgument(
                "classifier.sample_rate_hz must be non-zero".into(),
            ));
        }
        if c.center_x > c.raw_max || c.center_y > c.raw_max {
            return Err(WristError::InvalidArgument(
                "classifier center must lie within the raw range".into(),
            ));
        }
        let half_span = c.center_x.min(c.center_y).min(c.raw_max - c.center_x.max(c.center_y));
        if c.dead_zone >= half_span {
            return Err(WristError::InvalidArgument(format!(
                "classifier.dead_zone {} leaves no usable travel",
                c.dead_zone
            )));
        }
        let u = &self.ui;
        if u.scene_capacity < 2 {
            return Err(WristError::InvalidArgument(
                "ui.scene_capacity must hold Home plus one application".into(),
            ));
        }
        if u.app_capacity == 0 {
            return Err(WristError::InvalidArgument(
                "ui.app_capacity must be non-zero".into(),
            ));
        }
        if u.osk_visible_chars == 0 {
            return Err(WristError::InvalidArgument(
                "ui.osk_visible_chars must be non-zero".into(),
            ));
        }
        if u.nav_threshold <= 0 {
            return Err(WristError::InvalidArgument(
                "ui.nav_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}
