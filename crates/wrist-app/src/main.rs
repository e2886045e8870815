//! wrist-sim: run the UI runtime on the desktop.
//!
//! A partner thread plays the role of the input coprocessor: it samples a
//! scripted stick, runs the gesture classifier and pushes events over the
//! in-process channel. The main thread runs the frame loop against a
//! software framebuffer.
//!
//! Usage:
//!   wrist-sim [--config PATH] [--frames N] [--loop]
//!             [--record FILE | --replay FILE] [--screenshot PNG]
//!
//! The config path can also come from `WRIST_CONFIG`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow, bail};
use wrist_app::apps::demo_apps;
use wrist_app::capture::{self, Recorder};
use wrist_app::png_out::save_framebuffer;
use wrist_app::stick::{DEMO_SCRIPT, ScriptedStick};
use wrist_backend_fb::MonoFramebuffer;
use wrist_core::Runtime;
use wrist_input::{EventSender, EventSink, GestureClassifier, channel};
use wrist_types::clock::MonotonicClock;
use wrist_types::config::{ClassifierConfig, WristConfig};
use wrist_types::status::Status;

const FRAME_MS: u64 = 20;
const DEFAULT_FRAMES: u64 = 700;
const SIM_BATTERY_PERCENT: u8 = 87;

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    frames: Option<u64>,
    looping: bool,
    record: Option<PathBuf>,
    replay: Option<PathBuf>,
    screenshot: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{name} needs a value"))
        };
        match arg.as_str() {
            "--config" => opts.config = Some(value("--config")?.into()),
            "--frames" => {
                let raw = value("--frames")?;
                opts.frames = Some(raw.parse().with_context(|| format!("bad frame count '{raw}'"))?);
            },
            "--loop" => opts.looping = true,
            "--record" => opts.record = Some(value("--record")?.into()),
            "--replay" => opts.replay = Some(value("--replay")?.into()),
            "--screenshot" => opts.screenshot = Some(value("--screenshot")?.into()),
            other => bail!("unknown argument '{other}'"),
        }
    }
    if opts.record.is_some() && opts.replay.is_some() {
        bail!("--record and --replay are mutually exclusive");
    }
    if opts.config.is_none() {
        opts.config = std::env::var_os("WRIST_CONFIG").map(PathBuf::from);
    }
    Ok(opts)
}

/// Where the runtime's events come from.
enum Feed {
    Live(JoinHandle<EventSender>),
    Recording(JoinHandle<Recorder<EventSender, std::io::BufWriter<std::fs::File>>>),
    Replay(JoinHandle<usize>),
}

impl Feed {
    fn finish(self) -> Result<()> {
        let panicked = |_| anyhow!("input thread panicked");
        match self {
            Feed::Live(handle) => {
                handle.join().map_err(panicked)?;
            },
            Feed::Recording(handle) => {
                let recorder = handle.join().map_err(panicked)?;
                let count = recorder.recorded();
                recorder.finish()?;
                log::info!("Recorded {count} events");
            },
            Feed::Replay(handle) => {
                handle.join().map_err(panicked)?;
            },
        }
        Ok(())
    }
}

/// Run the classifier against the scripted stick until the script ends or
/// `stop` is raised. Hands the sink back when done.
fn spawn_partner<S>(
    config: ClassifierConfig,
    sink: S,
    looping: bool,
    stop: Arc<AtomicBool>,
) -> Result<JoinHandle<S>>
where
    S: EventSink + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("classifier".into())
        .spawn(move || {
            let mut stick = ScriptedStick::new(DEMO_SCRIPT, &config).looping(looping);
            let mut classifier = GestureClassifier::new(&config, MonotonicClock::new(), sink);
            let period = Duration::from_millis(classifier.sample_period_ms());
            while !stop.load(Ordering::Relaxed) && !stick.finished() {
                classifier.poll(&mut stick);
                thread::sleep(period);
            }
            log::info!("Classifier stopped after {} events", classifier.seq());
            classifier.into_sink()
        })?;
    Ok(handle)
}

/// Copy wall-clock time and the simulated battery into the status record.
fn with_wall_clock(mut status: Status) -> Status {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    status.hour = ((secs / 3600) % 24) as u8;
    status.minute = ((secs / 60) % 60) as u8;
    status.battery_percent = Some(SIM_BATTERY_PERCENT);
    status
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args(std::env::args().skip(1))?;
    let config = match &opts.config {
        Some(path) => WristConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => WristConfig::default(),
    };
    log::info!(
        "Starting wrist-sim ({}x{}, classifier at {} Hz)",
        config.ui.screen_width,
        config.ui.screen_height,
        config.classifier.sample_rate_hz,
    );

    let mut rt = Runtime::new(&config.ui, MonotonicClock::new());
    for app in demo_apps(&config.ui) {
        rt.register_app(app)?;
    }
    rt.init()?;

    let (tx, rx) = channel();
    rt.attach_source(Box::new(rx));

    let stop = Arc::new(AtomicBool::new(false));
    let feed = match (&opts.replay, &opts.record) {
        (Some(path), _) => Feed::Replay(capture::spawn_replay(path, tx, Duration::from_millis(FRAME_MS))?),
        (None, Some(path)) => {
            let recorder = Recorder::create(tx, path)?;
            Feed::Recording(spawn_partner(config.classifier.clone(), recorder, opts.looping, Arc::clone(&stop))?)
        },
        (None, None) => Feed::Live(spawn_partner(config.classifier.clone(), tx, opts.looping, Arc::clone(&stop))?),
    };

    let mut fb = MonoFramebuffer::new(config.ui.screen_width as u32, config.ui.screen_height as u32);
    let frame_budget = Duration::from_millis(FRAME_MS);
    let frames = opts.frames.unwrap_or(DEFAULT_FRAMES);
    let mut last = Instant::now();
    for _ in 0..frames {
        let started = Instant::now();
        let dt = started.duration_since(last).as_millis() as u64;
        last = started;

        rt.update_status(with_wall_clock(*rt.status()));
        rt.frame(&mut fb, dt)?;

        if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    stop.store(true, Ordering::Relaxed);
    // Dropping the receiver unblocks a replay that is still sending.
    drop(rt.detach_source());
    feed.finish()?;

    log::info!(
        "Ran {} frames, {} scenes deep, active app: {}",
        fb.refresh_count(),
        rt.scene_depth(),
        rt.active_app().unwrap_or("home"),
    );

    if let Some(path) = &opts.screenshot {
        save_framebuffer(path, &fb)?;
        log::info!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_flags() {
        let opts = parse_args(args(&["--frames", "10", "--loop", "--screenshot", "out.png"])).unwrap();
        assert_eq!(opts.frames, Some(10));
        assert!(opts.looping);
        assert_eq!(opts.screenshot, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--frames"])).is_err());
        assert!(parse_args(args(&["--frames", "many"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--record", "a", "--replay", "b"])).is_err());
    }

    #[test]
    fn wall_clock_keeps_other_fields() {
        let status = Status {
            wifi_connected: true,
            unread_notifications: 4,
            ..Status::default()
        };
        let updated = with_wall_clock(status);
        assert!(updated.wifi_connected);
        assert_eq!(updated.unread_notifications, 4);
        assert!(updated.hour < 24 && updated.minute < 60);
        assert_eq!(updated.battery_percent, Some(SIM_BATTERY_PERCENT));
    }
}
