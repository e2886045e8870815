use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wrist_input::{EventSink, channel};
use wrist_types::clock::ManualClock;
use wrist_types::input::Layer;

use super::*;
use crate::DialogOutcome;
use crate::osk::OskOutcome;
use crate::test_utils::RecordingDisplay;

type Log = Rc<RefCell<Vec<String>>>;
type InputHook = Box<dyn FnMut(&InputEvent, &mut AppContext)>;
type TickHook = Box<dyn FnMut(u64, &mut AppContext)>;

/// Application that records its callbacks and optionally reacts to them.
struct TestApp {
    id: &'static str,
    log: Log,
    input_hook: Option<InputHook>,
    tick_hook: Option<TickHook>,
}

impl TestApp {
    fn new(id: &'static str, log: &Log) -> Self {
        Self {
            id,
            log: Rc::clone(log),
            input_hook: None,
            tick_hook: None,
        }
    }

    fn on_input_do(mut self, f: impl FnMut(&InputEvent, &mut AppContext) + 'static) -> Self {
        self.input_hook = Some(Box::new(f));
        self
    }

    fn on_tick_do(mut self, f: impl FnMut(u64, &mut AppContext) + 'static) -> Self {
        self.tick_hook = Some(Box::new(f));
        self
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", self.id));
    }
}

impl Application for TestApp {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.id
    }

    fn on_enter(&mut self, _ctx: &mut AppContext) -> Result<()> {
        self.record("enter");
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut AppContext) {
        self.record("exit");
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut AppContext) {
        self.record("input");
        if let Some(hook) = self.input_hook.as_mut() {
            hook(event, ctx);
        }
    }

    fn on_render(&mut self, display: &mut dyn Display) -> Result<()> {
        display.draw_text(0, 20, self.id, wrist_types::display::PixelColor::White, 1)
    }

    fn on_tick(&mut self, dt_ms: u64, ctx: &mut AppContext) {
        if let Some(hook) = self.tick_hook.as_mut() {
            hook(dt_ms, ctx);
        }
    }
}

fn runtime() -> (Runtime<ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_000);
    let mut rt = Runtime::new(&UiConfig::default(), clock.clone());
    rt.init().unwrap();
    (rt, clock)
}

fn with_apps(ids: &[&'static str]) -> (Runtime<ManualClock>, ManualClock, Log) {
    let (mut rt, clock) = runtime();
    let log: Log = Rc::default();
    for &id in ids {
        rt.register_app(Box::new(TestApp::new(id, &log))).unwrap();
    }
    (rt, clock, log)
}

fn drain(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

fn ev(x: i8, y: i8, buttons: Buttons) -> InputEvent {
    InputEvent::new(x, y, buttons, Layer::Global, 0)
}

fn press() -> InputEvent {
    ev(0, 0, Buttons::PRESS)
}

fn idle() -> InputEvent {
    ev(0, 0, Buttons::empty())
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn init_twice_is_invalid_state() {
    let (mut rt, _clock) = runtime();
    assert!(matches!(rt.init(), Err(WristError::InvalidState(_))));
    assert_eq!(rt.scene_depth(), 1);
}

#[test]
fn input_before_init_is_invalid_state() {
    let mut rt = Runtime::new(&UiConfig::default(), ManualClock::new(0));
    let err = rt.handle_input(&idle()).unwrap_err();
    assert!(matches!(err, WristError::InvalidState(_)));
}

#[test]
fn launch_registered_app() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    assert_eq!(rt.scene_depth(), 2);
    assert_eq!(rt.active_app(), Some("notes"));
    assert_eq!(drain(&log), vec!["notes:enter"]);
}

#[test]
fn launch_unknown_app_is_not_found() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    let err = rt.launch("ghost").unwrap_err();
    assert!(matches!(err, WristError::NotFound(_)));
    assert_eq!(rt.scene_depth(), 1);
    assert!(drain(&log).is_empty());
}

#[test]
fn back_at_home_is_noop() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    assert!(!rt.go_back().unwrap());
    assert_eq!(rt.scene_depth(), 1);
    assert!(drain(&log).is_empty());
}

#[test]
fn launch_then_back_enters_then_exits_once() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    assert!(rt.go_back().unwrap());
    assert_eq!(drain(&log), vec!["notes:enter", "notes:exit"]);
    assert_eq!(rt.active_app(), None);
}

#[test]
fn full_stack_rejects_further_launches() {
    let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let (mut rt, _clock, _log) = with_apps(&ids);
    // Capacity 8 includes Home.
    for id in &ids[..7] {
        rt.launch(id).unwrap();
    }
    let err = rt.launch("h").unwrap_err();
    assert!(matches!(err, WristError::CapacityExceeded(_)));
    assert_eq!(rt.scene_depth(), 8);
}

#[test]
fn registration_capacity_is_bounded() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    let ids: Vec<&'static str> = (0..17)
        .map(|i| &*Box::leak(format!("app{i}").into_boxed_str()))
        .collect();
    for &id in &ids[..16] {
        rt.register_app(Box::new(TestApp::new(id, &log))).unwrap();
    }
    let err = rt.register_app(Box::new(TestApp::new(ids[16], &log))).unwrap_err();
    assert!(matches!(err, WristError::CapacityExceeded(_)));
    assert_eq!(rt.apps().len(), 16);
}

#[test]
fn home_button_pops_to_home() {
    let (mut rt, _clock, log) = with_apps(&["a", "b"]);
    rt.launch("a").unwrap();
    rt.launch("b").unwrap();
    drain(&log);
    rt.handle_input(&ev(0, 0, Buttons::HOME)).unwrap();
    assert_eq!(rt.scene_depth(), 1);
    assert_eq!(drain(&log), vec!["b:exit", "a:exit"]);
}

#[test]
fn back_button_pops_once_per_press() {
    let (mut rt, _clock, _log) = with_apps(&["a", "b"]);
    rt.launch("a").unwrap();
    rt.launch("b").unwrap();
    rt.handle_input(&ev(0, 0, Buttons::BACK)).unwrap();
    // Still held: not a new press.
    rt.handle_input(&ev(0, 0, Buttons::BACK)).unwrap();
    assert_eq!(rt.active_app(), Some("a"));
    rt.handle_input(&idle()).unwrap();
    rt.handle_input(&ev(0, 0, Buttons::BACK)).unwrap();
    assert_eq!(rt.scene_depth(), 1);
}

#[test]
fn home_menu_press_launches_selected_app() {
    let (mut rt, clock, log) = with_apps(&["notes", "music"]);
    rt.handle_input(&ev(100, 0, Buttons::empty())).unwrap();
    clock.advance(50);
    rt.handle_input(&press()).unwrap();
    assert_eq!(rt.active_app(), Some("music"));
    assert_eq!(drain(&log), vec!["music:enter"]);
}

#[test]
fn held_press_does_not_reach_surfaces_it_opened() {
    let (mut rt, clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(TestApp::new("notes", &log).on_input_do(|_, ctx| {
        if ctx.pressed().contains(Buttons::PRESS) {
            ctx.show_osk(OskRequest::new("Note", |_, _| {}));
        }
    })))
    .unwrap();

    // One hold: the initial press plus classifier keep-alives.
    rt.handle_input(&press()).unwrap();
    for _ in 0..2 {
        clock.advance(100);
        rt.handle_input(&press()).unwrap();
    }
    clock.advance(50);
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.active_app(), Some("notes"));
    assert!(!rt.osk_active());
    assert_eq!(
        drain(&log),
        vec!["notes:enter", "notes:input", "notes:input", "notes:input"]
    );

    // A fresh press opens the keyboard; holding it types nothing.
    clock.advance(400);
    rt.handle_input(&press()).unwrap();
    assert!(rt.osk_active());
    for _ in 0..5 {
        clock.advance(100);
        rt.handle_input(&press()).unwrap();
    }
    assert_eq!(rt.osk_text(), Some(""));
}

#[test]
fn input_reaches_only_the_active_app() {
    let (mut rt, _clock, log) = with_apps(&["a", "b"]);
    rt.launch("a").unwrap();
    rt.launch("b").unwrap();
    drain(&log);
    rt.handle_input(&idle()).unwrap();
    assert_eq!(drain(&log), vec!["b:input"]);
}

// ---------------------------------------------------------------------------
// Requests queued by callbacks
// ---------------------------------------------------------------------------

#[test]
fn requested_launch_failure_shows_notification() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(
        TestApp::new("menu", &log).on_input_do(|_, ctx| ctx.launch("ghost")),
    ))
    .unwrap();
    rt.launch("menu").unwrap();
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.notification_title(), Some(LAUNCH_FAILED_TEXT));
    assert_eq!(rt.scene_depth(), 2);
}

#[test]
fn app_can_launch_and_go_back() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(
        TestApp::new("list", &log).on_input_do(|_, ctx| ctx.launch("detail")),
    ))
    .unwrap();
    rt.register_app(Box::new(
        TestApp::new("detail", &log).on_input_do(|_, ctx| ctx.go_back()),
    ))
    .unwrap();
    rt.launch("list").unwrap();
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.active_app(), Some("detail"));
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.active_app(), Some("list"));
    assert_eq!(
        drain(&log),
        vec!["list:enter", "list:input", "detail:enter", "detail:input", "detail:exit"]
    );
}

#[test]
fn background_tick_updates_status() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(TestApp::new("music", &log).on_tick_do(|_, ctx| {
        ctx.update_status(|s| s.music_playing = true);
    })))
    .unwrap();
    rt.register_app(Box::new(TestApp::new("notes", &log))).unwrap();
    rt.launch("notes").unwrap();
    rt.tick(16);
    assert!(rt.status().music_playing);
}

#[test]
fn callback_notification_counts_as_unread() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(
        TestApp::new("spam", &log).on_input_do(|_, ctx| ctx.notify_simple("again")),
    ))
    .unwrap();
    rt.launch("spam").unwrap();
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.status().unread_notifications, 1);
}

#[test]
fn status_update_after_notification_keeps_unread() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(TestApp::new("player", &log).on_input_do(|_, ctx| {
        ctx.notify_simple("Next track");
        ctx.update_status(|s| s.music_playing = true);
    })))
    .unwrap();
    rt.launch("player").unwrap();
    rt.handle_input(&idle()).unwrap();
    assert_eq!(rt.status().unread_notifications, 1);
    assert!(rt.status().music_playing);
}

#[test]
fn status_updates_from_several_apps_merge() {
    let (mut rt, _clock) = runtime();
    let log: Log = Rc::default();
    rt.register_app(Box::new(TestApp::new("music", &log).on_tick_do(|_, ctx| {
        ctx.update_status(|s| s.music_playing = true);
    })))
    .unwrap();
    rt.register_app(Box::new(TestApp::new("radio", &log).on_tick_do(|_, ctx| {
        ctx.update_status(|s| s.wifi_connected = true);
    })))
    .unwrap();
    rt.tick(16);
    assert!(rt.status().music_playing);
    assert!(rt.status().wifi_connected);
}

#[test]
fn request_chain_is_capped_per_call() {
    fn reopening(count: &Rc<Cell<usize>>) -> OskRequest {
        let count = Rc::clone(count);
        OskRequest::new("Loop", move |_, ctx| {
            count.set(count.get() + 1);
            ctx.show_osk(reopening(&count));
        })
    }

    let (mut rt, _clock) = runtime();
    let count = Rc::new(Cell::new(0));
    rt.show_osk(reopening(&count));
    // Replacing the keyboard cancels the old one, whose callback opens
    // another, which cancels the one before it.
    rt.show_osk(reopening(&count));
    assert_eq!(count.get(), MAX_REQUESTS_PER_CALL + 1);
    assert!(rt.osk_active());

    // The next call starts from a fresh budget.
    rt.handle_input(&ev(0, 0, Buttons::HOME)).unwrap();
    assert_eq!(count.get(), MAX_REQUESTS_PER_CALL + 2);
    assert!(rt.osk_active());
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[test]
fn osk_isolates_the_scene() {
    let (mut rt, clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    drain(&log);
    rt.show_osk(OskRequest::new("Name", |_, _| {}));
    for _ in 0..5 {
        clock.advance(300);
        rt.handle_input(&press()).unwrap();
        rt.handle_input(&ev(0, -100, Buttons::empty())).unwrap();
    }
    assert!(rt.osk_active());
    assert!(drain(&log).is_empty());
}

#[test]
fn osk_max_length_rejects_extra_characters() {
    let (mut rt, clock) = runtime();
    rt.show_osk(OskRequest::new("Pin", |_, _| {}).max_length(5));
    for _ in 0..6 {
        clock.advance(250);
        rt.handle_input(&press()).unwrap();
        rt.handle_input(&idle()).unwrap();
    }
    assert_eq!(rt.osk_text(), Some("TTTTT"));
}

#[test]
fn osk_confirm_delivers_text_and_applies_requests() {
    let (mut rt, clock) = runtime();
    let result = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&result);
    rt.show_osk(
        OskRequest::new("Note", move |outcome, ctx| {
            if let OskOutcome::Confirmed(text) = &outcome {
                ctx.notify_simple(text.clone());
            }
            *sink.borrow_mut() = Some(outcome);
        })
        .initial_text("hi"),
    );
    // Row 1 -> row 3, then along to the confirm key.
    let moves = [(0, -100), (0, -100), (100, 0), (100, 0), (100, 0), (100, 0), (100, 0)];
    for (x, y) in moves {
        clock.advance(200);
        rt.handle_input(&ev(x, y, Buttons::empty())).unwrap();
    }
    clock.advance(200);
    rt.handle_input(&press()).unwrap();

    assert!(!rt.osk_active());
    assert_eq!(*result.borrow(), Some(OskOutcome::Confirmed("hi".into())));
    assert_eq!(rt.notification_title(), Some("hi"));
}

#[test]
fn home_cancels_osk_without_popping() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    let result = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&result);
    rt.show_osk(OskRequest::new("Name", move |outcome, _| {
        *sink.borrow_mut() = Some(outcome);
    }));
    drain(&log);
    rt.handle_input(&ev(0, 0, Buttons::HOME)).unwrap();
    assert!(!rt.osk_active());
    assert_eq!(*result.borrow(), Some(OskOutcome::Cancelled));
    assert_eq!(rt.scene_depth(), 2);
    assert!(drain(&log).is_empty());
}

#[test]
fn dialog_is_opaque_to_input() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    rt.show_dialog(Dialog::new("Quit?", "").plain_button("Yes").plain_button("No"))
        .unwrap();
    drain(&log);
    rt.handle_input(&ev(100, 0, Buttons::empty())).unwrap();
    assert!(rt.dialog_active());
    assert!(drain(&log).is_empty());
    rt.handle_input(&press()).unwrap();
    assert!(!rt.dialog_active());
    assert!(drain(&log).is_empty());
}

#[test]
fn dialog_button_callback_can_navigate() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    rt.show_dialog(Dialog::new("Leave?", "").button("Yes", |ctx| ctx.go_home()))
        .unwrap();
    drain(&log);
    rt.handle_input(&press()).unwrap();
    assert_eq!(rt.scene_depth(), 1);
    assert_eq!(drain(&log), vec!["notes:exit"]);
}

#[test]
fn back_dismisses_dialog_before_popping() {
    let (mut rt, _clock, _log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    let outcome = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&outcome);
    rt.show_dialog(
        Dialog::new("Save?", "")
            .button("Yes", |_| panic!("button must not run"))
            .on_close(move |o, _| *sink.borrow_mut() = Some(o)),
    )
    .unwrap();
    rt.handle_input(&ev(0, 0, Buttons::BACK)).unwrap();
    assert!(!rt.dialog_active());
    assert_eq!(*outcome.borrow(), Some(DialogOutcome::Dismissed));
    assert_eq!(rt.scene_depth(), 2);
}

#[test]
fn invalid_dialog_is_rejected() {
    let (mut rt, _clock) = runtime();
    let err = rt.show_dialog(Dialog::new("Empty", "")).unwrap_err();
    assert!(matches!(err, WristError::InvalidArgument(_)));
    assert!(!rt.dialog_active());
}

#[test]
fn notification_press_dismisses_instead_of_reaching_scene() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    let tapped = Rc::new(RefCell::new(false));
    let sink = Rc::clone(&tapped);
    rt.notify(Notification::new("Msg").on_tap(move |_| *sink.borrow_mut() = true))
        .unwrap();
    drain(&log);
    rt.handle_input(&press()).unwrap();
    assert!(!rt.notification_active());
    assert!(*tapped.borrow());
    assert!(drain(&log).is_empty());
    // Next event goes to the scene again.
    rt.handle_input(&idle()).unwrap();
    assert_eq!(drain(&log), vec!["notes:input"]);
}

#[test]
fn notification_auto_clears_after_duration() {
    let (mut rt, clock) = runtime();
    rt.notify_simple("Hello").unwrap();
    clock.advance(2_999);
    rt.tick(16);
    assert!(rt.notification_active());
    clock.advance(1);
    rt.tick(16);
    assert!(rt.notification_active());
    clock.advance(1);
    rt.tick(16);
    assert!(!rt.notification_active());
}

#[test]
fn second_notification_replaces_first() {
    let (mut rt, clock) = runtime();
    rt.notify_simple("First").unwrap();
    clock.advance(500);
    rt.notify_simple("Second").unwrap();
    clock.advance(1_000);
    rt.tick(16);
    assert_eq!(rt.notification_title(), Some("Second"));
    // First would have expired here; second is still within its window.
    clock.advance(2_000);
    rt.tick(16);
    assert_eq!(rt.notification_title(), Some("Second"));
    assert_eq!(rt.status().unread_notifications, 2);
}

#[test]
fn unread_count_saturates() {
    let (mut rt, _clock) = runtime();
    for _ in 0..300 {
        rt.notify_simple("x").unwrap();
    }
    assert_eq!(rt.status().unread_notifications, u8::MAX);
}

#[test]
fn empty_notification_rejected_without_counting() {
    let (mut rt, _clock) = runtime();
    assert!(rt.notify_simple("").is_err());
    assert_eq!(rt.status().unread_notifications, 0);
    assert!(!rt.notification_active());
}

// ---------------------------------------------------------------------------
// Frame loop
// ---------------------------------------------------------------------------

#[test]
fn frame_drains_one_event_per_call() {
    let (mut rt, _clock, log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    drain(&log);
    let (mut tx, rx) = channel();
    for seq in 1..=3 {
        tx.send(InputEvent::new(0, 0, Buttons::empty(), Layer::Global, seq))
            .unwrap();
    }
    rt.attach_source(Box::new(rx));

    let mut display = RecordingDisplay::new();
    rt.frame(&mut display, 16).unwrap();
    assert_eq!(drain(&log), vec!["notes:input"]);
    rt.frame(&mut display, 16).unwrap();
    rt.frame(&mut display, 16).unwrap();
    rt.frame(&mut display, 16).unwrap();
    assert_eq!(drain(&log).len(), 2);
    assert_eq!(display.refresh_count(), 4);
}

#[test]
fn frame_renders_status_scene_and_overlays() {
    let (mut rt, _clock, _log) = with_apps(&["notes"]);
    rt.launch("notes").unwrap();
    let mut status = *rt.status();
    status.hour = 9;
    status.minute = 41;
    rt.update_status(status);
    rt.notify_simple("Ping").unwrap();

    let mut display = RecordingDisplay::new();
    rt.frame(&mut display, 16).unwrap();
    let clock_at = display.text_index("09:41").unwrap();
    let app_at = display.text_index("notes").unwrap();
    let banner_at = display.text_index("Ping").unwrap();
    assert!(clock_at < app_at && app_at < banner_at);
    assert!(display.has_text("[1]"));
}

#[test]
fn frame_before_init_fails_when_input_pending() {
    let mut rt = Runtime::new(&UiConfig::default(), ManualClock::new(0));
    let (mut tx, rx) = channel();
    tx.send(idle()).unwrap();
    rt.attach_source(Box::new(rx));
    let mut display = RecordingDisplay::new();
    assert!(rt.frame(&mut display, 16).is_err());
}

#[test]
fn frame_propagates_display_failure() {
    let (mut rt, _clock) = runtime();
    let mut display = RecordingDisplay::new();
    display.fail_refresh = true;
    assert!(matches!(
        rt.frame(&mut display, 16),
        Err(WristError::Display(_))
    ));
}
