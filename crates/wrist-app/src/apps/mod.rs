//! Demo applications bundled with the simulator.

mod music;
mod notes;
mod settings;

pub use music::{MusicApp, Track};
pub use notes::NotesApp;
pub use settings::SettingsApp;

use wrist_core::Application;
use wrist_types::config::UiConfig;

/// The default application set, in Home Menu order.
pub fn demo_apps(config: &UiConfig) -> Vec<Box<dyn Application>> {
    vec![
        Box::new(NotesApp::new(config)),
        Box::new(MusicApp::new(config, music::DEMO_PLAYLIST)),
        Box::new(SettingsApp::new(config)),
    ]
}
