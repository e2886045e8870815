//! Application lifecycle contract.
//!
//! Applications never call back into the runtime directly. Every callback
//! gets an [`AppContext`] through which it queues [`UiRequest`]s; the
//! runtime applies them, in order, after the callback returns.

use wrist_types::display::Display;
use wrist_types::error::Result;
use wrist_types::input::{Buttons, InputEvent};
use wrist_types::status::Status;

use crate::osk::OskRequest;
use crate::overlay::dialog::Dialog;
use crate::overlay::notification::Notification;

/// Width and height of an application icon (1bpp, 2 bytes per row).
pub const ICON_SIZE: i32 = 16;

/// A full-screen application hosted by the scene stack.
///
/// Only the active (top-of-stack) application receives `on_input` and
/// `on_render`. `on_tick` is delivered to every registered application on
/// every frame, focused or not.
pub trait Application {
    /// Unique identifier used by `launch`.
    fn id(&self) -> &str;

    /// Display name shown in the Home Menu.
    fn name(&self) -> &str;

    /// 16x16 1bpp icon, row-major, MSB first. `None` draws a default box.
    fn icon(&self) -> Option<&[u8]> {
        None
    }

    /// Pushed onto the scene stack.
    ///
    /// An error is logged but the application stays pushed, so the
    /// matching `on_exit` still runs on the next pop.
    fn on_enter(&mut self, _ctx: &mut AppContext) -> Result<()> {
        Ok(())
    }

    /// Popped off the scene stack.
    fn on_exit(&mut self, _ctx: &mut AppContext) {}

    fn on_input(&mut self, event: &InputEvent, ctx: &mut AppContext);

    /// Draw the content area (below the status bar).
    fn on_render(&mut self, display: &mut dyn Display) -> Result<()>;

    fn on_tick(&mut self, _dt_ms: u64, _ctx: &mut AppContext) {}
}

/// Field-level edit of the status record.
pub type StatusUpdate = Box<dyn FnOnce(&mut Status)>;

/// Deferred UI operation queued by a callback.
pub enum UiRequest {
    Launch(String),
    Back,
    Home,
    Notify(Notification),
    DismissNotification,
    ShowDialog(Dialog),
    CloseDialog,
    ShowOsk(OskRequest),
    /// Applied to the live record, so fields the edit does not touch keep
    /// whatever earlier requests wrote to them.
    UpdateStatus(StatusUpdate),
}

impl std::fmt::Debug for UiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch(id) => f.debug_tuple("Launch").field(id).finish(),
            Self::Back => f.write_str("Back"),
            Self::Home => f.write_str("Home"),
            Self::Notify(n) => f.debug_tuple("Notify").field(&n.title()).finish(),
            Self::DismissNotification => f.write_str("DismissNotification"),
            Self::ShowDialog(d) => f.debug_tuple("ShowDialog").field(&d.title()).finish(),
            Self::CloseDialog => f.write_str("CloseDialog"),
            Self::ShowOsk(r) => f.debug_tuple("ShowOsk").field(&r.title()).finish(),
            Self::UpdateStatus(_) => f.write_str("UpdateStatus"),
        }
    }
}

/// Handle passed to application and overlay callbacks.
#[derive(Debug)]
pub struct AppContext {
    now_ms: u64,
    status: Status,
    pressed: Buttons,
    requests: Vec<UiRequest>,
}

impl AppContext {
    pub fn new(now_ms: u64, status: Status) -> Self {
        Self {
            now_ms,
            status,
            pressed: Buttons::empty(),
            requests: Vec::new(),
        }
    }

    /// Set the buttons that went down with the event being delivered.
    pub fn with_pressed(mut self, pressed: Buttons) -> Self {
        self.pressed = pressed;
        self
    }

    /// Runtime clock at the time of the callback.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Buttons that went down with the current input event. Empty outside
    /// `on_input` and while a button is merely held.
    pub fn pressed(&self) -> Buttons {
        self.pressed
    }

    /// Snapshot of the system status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn launch(&mut self, app_id: impl Into<String>) {
        self.requests.push(UiRequest::Launch(app_id.into()));
    }

    pub fn go_back(&mut self) {
        self.requests.push(UiRequest::Back);
    }

    pub fn go_home(&mut self) {
        self.requests.push(UiRequest::Home);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.requests.push(UiRequest::Notify(notification));
    }

    /// Normal-priority notification with the default duration.
    pub fn notify_simple(&mut self, text: impl Into<String>) {
        self.notify(Notification::new(text));
    }

    pub fn dismiss_notification(&mut self) {
        self.requests.push(UiRequest::DismissNotification);
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.requests.push(UiRequest::ShowDialog(dialog));
    }

    pub fn close_dialog(&mut self) {
        self.requests.push(UiRequest::CloseDialog);
    }

    pub fn show_osk(&mut self, request: OskRequest) {
        self.requests.push(UiRequest::ShowOsk(request));
    }

    /// Edit the status record. The edit runs on the local snapshot now and
    /// on the live record when the request is applied.
    pub fn update_status<F>(&mut self, update: F)
    where
        F: Fn(&mut Status) + 'static,
    {
        update(&mut self.status);
        self.requests.push(UiRequest::UpdateStatus(Box::new(update)));
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Take the queued requests, oldest first.
    pub fn take_requests(&mut self) -> Vec<UiRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_queue_in_order() {
        let mut ctx = AppContext::new(5, Status::default());
        ctx.launch("notes");
        ctx.notify_simple("hi");
        ctx.go_back();
        let reqs = ctx.take_requests();
        assert_eq!(reqs.len(), 3);
        assert!(matches!(&reqs[0], UiRequest::Launch(id) if id == "notes"));
        assert!(matches!(&reqs[1], UiRequest::Notify(n) if n.title() == "hi"));
        assert!(matches!(reqs[2], UiRequest::Back));
        assert!(!ctx.has_requests());
    }

    #[test]
    fn update_status_refreshes_snapshot() {
        let mut ctx = AppContext::new(0, Status::default());
        ctx.update_status(|s| s.music_playing = true);
        assert!(ctx.status().music_playing);
        assert!(ctx.has_requests());
    }

    #[test]
    fn status_update_touches_only_its_fields() {
        let mut ctx = AppContext::new(0, Status::default());
        ctx.update_status(|s| s.battery_percent = Some(40));
        let Some(UiRequest::UpdateStatus(update)) = ctx.take_requests().pop() else {
            panic!("expected a status update");
        };
        let mut live = Status {
            unread_notifications: 3,
            ..Status::default()
        };
        update(&mut live);
        assert_eq!(live.battery_percent, Some(40));
        assert_eq!(live.unread_notifications, 3);
    }

    #[test]
    fn pressed_defaults_to_empty() {
        let ctx = AppContext::new(0, Status::default());
        assert!(ctx.pressed().is_empty());
        assert_eq!(ctx.with_pressed(Buttons::PRESS).pressed(), Buttons::PRESS);
    }

    #[test]
    fn debug_format_names_request() {
        let r = UiRequest::Launch("music".into());
        assert_eq!(format!("{r:?}"), "Launch(\"music\")");
    }
}
