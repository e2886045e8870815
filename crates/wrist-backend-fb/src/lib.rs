//! Software framebuffer backend.
//!
//! [`MonoFramebuffer`] rasterizes every [`Display`](wrist_types::display::Display)
//! call into a 1-bit page buffer, the same layout a 128x64 monochrome OLED
//! takes over I2C or SPI. It backs the desktop simulator, screenshots and
//! rendering tests.

pub mod font;
mod framebuffer;

pub use framebuffer::MonoFramebuffer;
