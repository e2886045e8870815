//! Scripted stick standing in for the ADC and button lines.
//!
//! A script is a list of [`Step`]s, each held for a number of samples. The
//! stick converts percentage deflection back into raw ADC counts using the
//! classifier calibration, so the classifier sees exactly what hardware
//! would produce.

use wrist_input::{InputSource, RawSample};
use wrist_types::config::ClassifierConfig;

/// One held stick position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Samples to hold this position for.
    pub samples: u32,
    /// Deflection in percent, -100..=100, positive right.
    pub x: i8,
    /// Deflection in percent, -100..=100, positive up.
    pub y: i8,
    pub press: bool,
    pub home: bool,
    pub back: bool,
}

impl Step {
    pub const fn rest(samples: u32) -> Self {
        Self {
            samples,
            x: 0,
            y: 0,
            press: false,
            home: false,
            back: false,
        }
    }

    pub const fn tilt(samples: u32, x: i8, y: i8) -> Self {
        Self {
            x,
            y,
            ..Self::rest(samples)
        }
    }

    pub const fn press(samples: u32) -> Self {
        Self {
            press: true,
            ..Self::rest(samples)
        }
    }

    pub const fn home(samples: u32) -> Self {
        Self {
            home: true,
            ..Self::rest(samples)
        }
    }

    pub const fn back(samples: u32) -> Self {
        Self {
            back: true,
            ..Self::rest(samples)
        }
    }
}

/// Tour of the demo apps at 100 Hz: Music, Settings, then the keyboard.
pub const DEMO_SCRIPT: &[Step] = &[
    Step::rest(50),
    // Home: Notes -> Music, open it, start playback.
    Step::tilt(10, 100, 0),
    Step::rest(30),
    Step::press(10),
    Step::rest(40),
    Step::press(10),
    Step::rest(150),
    Step::back(10),
    Step::rest(40),
    // Home: Music -> Settings, toggle Wi-Fi.
    Step::tilt(10, 100, 0),
    Step::rest(30),
    Step::press(10),
    Step::rest(40),
    Step::press(10),
    // Long enough for the banner to time out.
    Step::rest(320),
    Step::home(10),
    Step::rest(40),
    // Back to Notes and start typing.
    Step::tilt(10, -100, 0),
    Step::rest(30),
    Step::tilt(10, -100, 0),
    Step::rest(30),
    Step::press(10),
    Step::rest(40),
    Step::press(10),
    Step::rest(40),
    Step::press(10),
    Step::rest(40),
    Step::press(10),
    Step::rest(60),
    Step::home(10),
    Step::rest(50),
];

pub struct ScriptedStick {
    script: Vec<Step>,
    step: usize,
    remaining: u32,
    config: ClassifierConfig,
    looping: bool,
}

impl ScriptedStick {
    pub fn new(script: &[Step], config: &ClassifierConfig) -> Self {
        Self {
            remaining: script.first().map_or(0, |s| s.samples),
            script: script.to_vec(),
            step: 0,
            config: config.clone(),
            looping: false,
        }
    }

    /// Restart from the top instead of resting when the script ends.
    pub fn looping(mut self, on: bool) -> Self {
        self.looping = on;
        self
    }

    /// Whether every step has been played (never true when looping).
    pub fn finished(&self) -> bool {
        self.step >= self.script.len()
    }

    /// Total samples in one pass of the script.
    pub fn len_samples(&self) -> u64 {
        self.script.iter().map(|s| u64::from(s.samples)).sum()
    }

    fn raw_axis(&self, percent: i8, center: u16, invert: bool) -> u16 {
        let percent = i32::from(percent.clamp(-100, 100));
        let percent = if invert { -percent } else { percent };
        let center = i32::from(center);
        let span = if percent >= 0 {
            i32::from(self.config.raw_max) - center
        } else {
            center
        };
        (center + span * percent / 100).clamp(0, i32::from(self.config.raw_max)) as u16
    }

    fn sample_for(&self, step: &Step) -> RawSample {
        RawSample {
            x: self.raw_axis(step.x, self.config.center_x, self.config.invert_x),
            y: self.raw_axis(step.y, self.config.center_y, self.config.invert_y),
            press: step.press,
            home: step.home,
            back: step.back,
        }
    }
}

impl InputSource for ScriptedStick {
    fn read(&mut self) -> RawSample {
        while self.remaining == 0 {
            if self.step + 1 < self.script.len() {
                self.step += 1;
            } else if self.looping && !self.script.is_empty() {
                self.step = 0;
            } else {
                self.step = self.script.len();
                return RawSample::at_rest(self.config.center_x, self.config.center_y);
            }
            self.remaining = self.script[self.step].samples;
        }
        self.remaining -= 1;
        self.sample_for(&self.script[self.step])
    }
}
