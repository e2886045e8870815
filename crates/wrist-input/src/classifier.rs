//! Gesture classifier.
//!
//! Sampled at a fixed rate. Each sample normalizes both axes, runs the
//! primary button through the press / double-press / long-press rules, ORs
//! in the auxiliary lines, and decides whether the resulting state is worth
//! emitting.
//!
//! Emission happens when an axis moved by more than the hysteresis since
//! the last emitted event, the button mask changed, the context layer
//! changed, or the keep-alive interval passed with nothing else to say.

use wrist_types::clock::Clock;
use wrist_types::config::ClassifierConfig;
use wrist_types::input::{Buttons, InputEvent, Layer};

use crate::axis::AxisCalibration;
use crate::sink::EventSink;
use crate::source::{InputSource, RawSample};

/// Primary-button gesture tracking.
#[derive(Debug, Clone, Default)]
struct PressState {
    was_down: bool,
    down_at: u64,
    last_down_edge: Option<u64>,
    press_count: u32,
    long_fired: bool,
}

/// Axis/button/layer snapshot compared between emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Snapshot {
    x: i8,
    y: i8,
    buttons: Buttons,
    layer: Layer,
}

/// Turns raw stick samples into [`InputEvent`]s delivered to a sink.
pub struct GestureClassifier<C: Clock, S: EventSink> {
    x_axis: AxisCalibration,
    y_axis: AxisCalibration,
    double_press_ms: u64,
    long_press_ms: u64,
    hysteresis: u8,
    keepalive_ms: u64,
    sample_period_ms: u64,
    clock: C,
    sink: S,
    layer: Layer,
    press: PressState,
    current: Snapshot,
    last_sent: Snapshot,
    last_emit_ms: u64,
    seq: u32,
}

impl<C: Clock, S: EventSink> GestureClassifier<C, S> {
    pub fn new(config: &ClassifierConfig, clock: C, sink: S) -> Self {
        let now = clock.now_ms();
        Self {
            x_axis: AxisCalibration {
                center: config.center_x,
                dead_zone: config.dead_zone,
                raw_max: config.raw_max,
                invert: config.invert_x,
            },
            y_axis: AxisCalibration {
                center: config.center_y,
                dead_zone: config.dead_zone,
                raw_max: config.raw_max,
                invert: config.invert_y,
            },
            double_press_ms: config.double_press_ms,
            long_press_ms: config.long_press_ms,
            hysteresis: config.hysteresis,
            keepalive_ms: config.keepalive_ms,
            sample_period_ms: config.sample_period_ms(),
            clock,
            sink,
            layer: Layer::Global,
            press: PressState::default(),
            current: Snapshot::default(),
            last_sent: Snapshot::default(),
            last_emit_ms: now,
            seq: 0,
        }
    }

    /// Read one sample from `source` and classify it.
    pub fn poll<I: InputSource + ?Sized>(&mut self, source: &mut I) -> Option<InputEvent> {
        let raw = source.read();
        self.sample(raw)
    }

    /// Classify one raw sample. Returns the event if one was emitted.
    pub fn sample(&mut self, raw: RawSample) -> Option<InputEvent> {
        let now = self.clock.now_ms();

        self.current.x = self.x_axis.normalize(raw.x);
        self.current.y = self.y_axis.normalize(raw.y);
        self.current.buttons = self.classify_buttons(raw, now);
        self.current.layer = self.layer;

        if self.should_emit(now) {
            Some(self.emit(now))
        } else {
            None
        }
    }

    fn classify_buttons(&mut self, raw: RawSample, now: u64) -> Buttons {
        let mut buttons = Buttons::empty();
        let p = &mut self.press;

        if raw.press && !p.was_down {
            p.down_at = now;
            p.long_fired = false;
            p.press_count = match p.last_down_edge {
                Some(prev) if now.saturating_sub(prev) < self.double_press_ms => {
                    p.press_count.saturating_add(1)
                },
                _ => 1,
            };
            p.last_down_edge = Some(now);
        }

        if raw.press {
            buttons |= Buttons::PRESS;
            if !p.long_fired && now.saturating_sub(p.down_at) > self.long_press_ms {
                buttons |= Buttons::LONG;
                p.long_fired = true;
            }
        } else if p.was_down && p.press_count >= 2 {
            buttons |= Buttons::DOUBLE;
        }
        p.was_down = raw.press;

        if raw.home {
            buttons |= Buttons::HOME;
        }
        if raw.back {
            buttons |= Buttons::BACK;
        }
        buttons
    }

    fn should_emit(&self, now: u64) -> bool {
        let (cur, last) = (&self.current, &self.last_sent);
        let h = i16::from(self.hysteresis);
        cur.buttons != last.buttons
            || (i16::from(cur.x) - i16::from(last.x)).abs() > h
            || (i16::from(cur.y) - i16::from(last.y)).abs() > h
            || cur.layer != last.layer
            || now.saturating_sub(self.last_emit_ms) >= self.keepalive_ms
    }

    fn emit(&mut self, now: u64) -> InputEvent {
        self.seq = self.seq.wrapping_add(1);
        let c = self.current;
        let event = InputEvent::new(c.x, c.y, c.buttons, c.layer, self.seq);
        if let Err(e) = self.sink.send(event) {
            log::warn!("Input event seq={} lost: {e}", self.seq);
        }
        self.last_sent = c;
        self.last_emit_ms = now;
        log::debug!(
            "Input event: x={} y={} buttons={:#04x} layer={} seq={}",
            c.x,
            c.y,
            c.buttons.bits(),
            c.layer.as_u8(),
            self.seq
        );
        event
    }

    /// Set the context layer stamped on subsequent events.
    ///
    /// Unknown layers are ignored. Returns whether the hint was accepted.
    pub fn set_layer(&mut self, layer: Layer) -> bool {
        if !layer.is_known() {
            log::warn!("Ignoring unknown input layer {}", layer.as_u8());
            return false;
        }
        self.layer = layer;
        true
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Whether the latest sample deflects either axis past `threshold`.
    pub fn has_movement(&self, threshold: i8) -> bool {
        self.current.x.unsigned_abs() > threshold.unsigned_abs()
            || self.current.y.unsigned_abs() > threshold.unsigned_abs()
    }

    /// The latest classified state, stamped with the last emitted sequence
    /// number.
    pub fn current_state(&self) -> InputEvent {
        let c = self.current;
        InputEvent::new(c.x, c.y, c.buttons, c.layer, self.seq)
    }

    /// Sequence number of the last emitted event (0 before the first).
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Interval between samples at the configured rate.
    pub fn sample_period_ms(&self) -> u64 {
        self.sample_period_ms
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Stop classifying and hand the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
