//! Foundation types for the wrist UI runtime.
//!
//! This crate contains the platform-agnostic types shared by every other
//! crate in the workspace: the input event and its wire layout, the display
//! collaborator trait, the injected clock, the system status record,
//! configuration, and the error taxonomy.

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod status;
pub mod wire;
