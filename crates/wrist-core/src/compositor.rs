//! Frame composition.
//!
//! Bottom-up: status bar, active scene, overlays, then one refresh. Nothing
//! is drawn after the refresh.

use wrist_types::config::UiConfig;
use wrist_types::display::Display;
use wrist_types::error::Result;
use wrist_types::status::Status;

use crate::overlay::OverlayArbitrator;
use crate::registry::AppRegistry;
use crate::scene::SceneStack;
use crate::statusbar;

/// Everything a frame is composed from.
pub struct FrameParts<'a> {
    pub status: &'a Status,
    pub scenes: &'a mut SceneStack,
    pub registry: &'a mut AppRegistry,
    pub overlays: &'a OverlayArbitrator,
}

/// Compose and present one frame.
///
/// A failing scene render is logged and the rest of the frame still draws;
/// display errors from the frame itself propagate.
pub fn compose(display: &mut dyn Display, parts: FrameParts<'_>, config: &UiConfig) -> Result<()> {
    display.clear()?;
    statusbar::render(display, parts.status, config.screen_width, config.status_bar_height)?;

    if let Err(e) = parts.scenes.render(
        display,
        parts.registry,
        config.screen_width,
        config.status_bar_height,
    ) {
        log::warn!("Scene render failed: {e}");
    }

    parts.overlays.render(display, config)?;
    display.refresh()
}
