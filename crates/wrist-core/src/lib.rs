//! Core runtime for the wrist UI.
//!
//! Owns the scene stack (Home Menu plus running applications), the overlay
//! arbitrator (notification banner, modal dialog, on-screen keyboard) and
//! the render compositor. Everything is driven from one loop through
//! [`Runtime`]; nothing here is shared across threads.

pub mod app;
pub mod compositor;
pub mod home;
pub mod menu_list;
pub mod nav;
pub mod osk;
pub mod overlay;
pub mod registry;
pub mod runtime;
pub mod scene;
pub mod statusbar;

#[cfg(test)]
pub(crate) mod test_utils;

pub use app::{AppContext, Application, StatusUpdate, UiRequest};
pub use overlay::dialog::{Dialog, DialogOutcome};
pub use overlay::notification::{Notification, Priority};
pub use osk::{OskOutcome, OskRequest};
pub use runtime::Runtime;
