//! Render the UI in a few fixed states and save each frame as a PNG.
//!
//! Runs headless on a manual clock, so output is identical from run to run.
//!
//! Usage:
//!   wrist-screenshot [output_dir]
//!   WRIST_SCREENSHOT_DIR=out wrist-screenshot
//!
//! Output:
//!   01_home.png          -- Home Menu with the demo apps
//!   02_music.png         -- Music playing, status bar note indicator
//!   03_notification.png  -- Banner over the Settings list
//!   04_dialog.png        -- About dialog
//!   05_keyboard.png      -- On-screen keyboard with some text

use std::path::PathBuf;

use anyhow::Result;
use wrist_app::apps::demo_apps;
use wrist_app::png_out::save_framebuffer;
use wrist_backend_fb::MonoFramebuffer;
use wrist_core::{Notification, OskRequest, Runtime};
use wrist_types::clock::ManualClock;
use wrist_types::config::UiConfig;
use wrist_types::input::{Buttons, InputEvent, Layer};
use wrist_types::status::Status;

const STEP_MS: u64 = 400;

struct Session {
    rt: Runtime<ManualClock>,
    clock: ManualClock,
    fb: MonoFramebuffer,
    out_dir: PathBuf,
}

impl Session {
    fn input(&mut self, x: i8, y: i8, buttons: Buttons) -> Result<()> {
        self.clock.advance(STEP_MS);
        self.rt
            .handle_input(&InputEvent::new(x, y, buttons, Layer::Global, 0))?;
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        self.input(0, 0, Buttons::PRESS)?;
        self.input(0, 0, Buttons::empty())
    }

    fn nudge(&mut self, x: i8, y: i8) -> Result<()> {
        self.input(x, y, Buttons::empty())?;
        self.input(0, 0, Buttons::empty())
    }

    fn capture(&mut self, name: &str) -> Result<()> {
        self.clock.advance(STEP_MS);
        self.rt.tick(STEP_MS);
        self.rt.render(&mut self.fb)?;
        let path = self.out_dir.join(name);
        save_framebuffer(&path, &self.fb)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WRIST_SCREENSHOT_DIR").ok())
        .unwrap_or_else(|| "screenshots".to_string())
        .into();

    let config = UiConfig::default();
    let clock = ManualClock::new(0);
    let mut rt = Runtime::new(&config, clock.clone());
    for app in demo_apps(&config) {
        rt.register_app(app)?;
    }
    rt.init()?;
    rt.update_status(Status {
        hour: 10,
        minute: 42,
        battery_percent: Some(87),
        ble_connected: true,
        ..Status::default()
    });

    let mut s = Session {
        rt,
        clock,
        fb: MonoFramebuffer::new(config.screen_width as u32, config.screen_height as u32),
        out_dir,
    };

    s.capture("01_home.png")?;

    s.rt.launch("music")?;
    s.click()?;
    s.capture("02_music.png")?;
    s.rt.go_home()?;

    s.rt.launch("settings")?;
    s.rt.notify(Notification::new("Message").body("Lunch at 12?"))?;
    s.capture("03_notification.png")?;
    s.rt.dismiss_notification();

    s.nudge(0, -100)?;
    s.nudge(0, -100)?;
    s.click()?;
    s.capture("04_dialog.png")?;
    s.rt.close_dialog();

    s.rt.show_osk(OskRequest::new("Reply", |_, _| {}).initial_text("ON MY WAY"));
    s.capture("05_keyboard.png")?;

    log::info!("Screenshots written to {}", s.out_dir.display());
    Ok(())
}
