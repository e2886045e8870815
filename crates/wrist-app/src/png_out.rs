//! PNG export of framebuffer contents.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use wrist_backend_fb::MonoFramebuffer;

/// Save the framebuffer as an RGBA PNG, white pixels on black.
pub fn save_framebuffer(path: &Path, fb: &MonoFramebuffer) -> anyhow::Result<()> {
    save_png(path, fb.width() as u32, fb.height() as u32, &fb.to_rgba())
        .with_context(|| format!("writing {}", path.display()))
}

fn save_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    Ok(())
}
