//! Desktop simulator pieces: demo applications, a scripted stick standing
//! in for the ADC, event capture/replay and PNG export.

pub mod apps;
pub mod capture;
pub mod icons;
pub mod png_out;
pub mod stick;

use wrist_core::nav::NavTiming;
use wrist_types::config::UiConfig;

/// Navigation timing for full-screen lists, taken from the menu settings.
pub fn list_timing(config: &UiConfig) -> NavTiming {
    NavTiming {
        threshold: config.nav_threshold,
        nav_repeat_ms: config.menu_nav_repeat_ms,
        press_debounce_ms: config.menu_press_debounce_ms,
    }
}
