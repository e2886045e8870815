//! Music: a playlist player. Playback keeps advancing in the background
//! because every application is ticked, focused or not.

use wrist_core::nav::{Direction, NavInput};
use wrist_core::{AppContext, Application, Notification, Priority};
use wrist_types::config::UiConfig;
use wrist_types::display::{DISPLAY_WIDTH, Display, PixelColor, text_width};
use wrist_types::error::Result;
use wrist_types::input::InputEvent;

use crate::icons;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub length_ms: u64,
}

pub(super) const DEMO_PLAYLIST: &[Track] = &[
    Track {
        title: "Morning Run",
        length_ms: 184_000,
    },
    Track {
        title: "Low Tide",
        length_ms: 212_000,
    },
    Track {
        title: "Night Drive",
        length_ms: 247_000,
    },
];

const BAR_X: i32 = 8;
const BAR_Y: i32 = 40;
const BAR_W: i32 = DISPLAY_WIDTH - 16;
const BAR_H: i32 = 5;

pub struct MusicApp {
    tracks: &'static [Track],
    current: usize,
    position_ms: u64,
    playing: bool,
    nav: NavInput,
}

impl MusicApp {
    pub fn new(config: &UiConfig, tracks: &'static [Track]) -> Self {
        Self {
            tracks,
            current: 0,
            position_ms: 0,
            playing: false,
            nav: NavInput::new(crate::list_timing(config)),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn skip(&mut self, forward: bool) {
        let n = self.tracks.len();
        if n == 0 {
            return;
        }
        self.current = if forward {
            (self.current + 1) % n
        } else {
            (self.current + n - 1) % n
        };
        self.position_ms = 0;
    }

    fn set_playing(&mut self, playing: bool, ctx: &mut AppContext) {
        self.playing = playing;
        ctx.update_status(move |s| s.music_playing = playing);
    }

    fn announce(&self, ctx: &mut AppContext) {
        if let Some(track) = self.current_track() {
            ctx.notify(
                Notification::new("Now playing")
                    .body(track.title)
                    .priority(Priority::Low),
            );
        }
    }
}

fn mm_ss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Application for MusicApp {
    fn id(&self) -> &str {
        "music"
    }

    fn name(&self) -> &str {
        "Music"
    }

    fn icon(&self) -> Option<&[u8]> {
        Some(icons::MUSIC.as_slice())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut AppContext) {
        let now = ctx.now_ms();
        match self.nav.direction(event, now) {
            Some(Direction::Right) => {
                self.skip(true);
                if self.playing {
                    self.announce(ctx);
                }
            },
            Some(Direction::Left) => self.skip(false),
            _ => {},
        }
        if self.nav.pressed(ctx.pressed(), now) && !self.tracks.is_empty() {
            self.set_playing(!self.playing, ctx);
        }
    }

    fn on_render(&mut self, display: &mut dyn Display) -> Result<()> {
        let Some(track) = self.current_track() else {
            return display.draw_text(4, 28, "No tracks", PixelColor::White, 1);
        };
        let title_x = ((DISPLAY_WIDTH - text_width(track.title, 1)) / 2).max(0);
        display.draw_text(title_x, 16, track.title, PixelColor::White, 1)?;
        let state = if self.playing { ">" } else { "||" };
        display.draw_text(4, 28, state, PixelColor::White, 1)?;
        let counter = format!("{}/{}", self.current + 1, self.tracks.len());
        display.draw_text(DISPLAY_WIDTH - 4 - text_width(&counter, 1), 28, &counter, PixelColor::White, 1)?;

        display.draw_rect(BAR_X, BAR_Y, BAR_W, BAR_H, PixelColor::White)?;
        let filled = (BAR_W as u64 * self.position_ms / track.length_ms.max(1)) as i32;
        if filled > 0 {
            display.fill_rect(BAR_X, BAR_Y, filled.min(BAR_W), BAR_H, PixelColor::White)?;
        }
        let times = format!("{} / {}", mm_ss(self.position_ms), mm_ss(track.length_ms));
        display.draw_text(BAR_X, BAR_Y + 8, &times, PixelColor::White, 1)
    }

    fn on_tick(&mut self, dt_ms: u64, ctx: &mut AppContext) {
        if !self.playing {
            return;
        }
        let Some(length) = self.current_track().map(|t| t.length_ms) else {
            return;
        };
        self.position_ms += dt_ms;
        if self.position_ms >= length {
            self.skip(true);
            self.announce(ctx);
        }
    }
}
