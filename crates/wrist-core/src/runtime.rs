//! The runtime context -- one object owning every piece of UI state.
//!
//! [`Runtime::frame`] is the periodic loop body: take at most one pending
//! input event, advance overlay timers, tick every application, then
//! compose and present the frame. All mutation goes through `&mut self`,
//! so the state is serialized by construction.

use std::collections::VecDeque;

use wrist_input::EventSource;
use wrist_types::clock::Clock;
use wrist_types::config::UiConfig;
use wrist_types::display::Display;
use wrist_types::error::{Result, WristError};
use wrist_types::input::{Buttons, InputEvent};
use wrist_types::status::Status;

use crate::app::{AppContext, Application, UiRequest};
use crate::compositor::{self, FrameParts};
use crate::nav::NavTiming;
use crate::osk::OskRequest;
use crate::overlay::dialog::Dialog;
use crate::overlay::notification::Notification;
use crate::overlay::{OverlayArbitrator, Routed};
use crate::registry::{AppInfo, AppRegistry};
use crate::scene::SceneStack;

/// Requests applied per entry point before the rest are dropped. Stops a
/// callback that keeps queueing work from stalling the loop.
const MAX_REQUESTS_PER_CALL: usize = 64;

/// Text of the banner shown when a requested launch fails.
pub const LAUNCH_FAILED_TEXT: &str = "Launch failed";

pub struct Runtime<C: Clock> {
    config: UiConfig,
    clock: C,
    registry: AppRegistry,
    scenes: SceneStack,
    overlays: OverlayArbitrator,
    status: Status,
    last_buttons: Buttons,
    source: Option<Box<dyn EventSource>>,
}

impl<C: Clock> Runtime<C> {
    pub fn new(config: &UiConfig, clock: C) -> Self {
        let home_timing = NavTiming {
            threshold: config.nav_threshold,
            nav_repeat_ms: config.menu_nav_repeat_ms,
            press_debounce_ms: config.menu_press_debounce_ms,
        };
        Self {
            config: config.clone(),
            clock,
            registry: AppRegistry::new(config.app_capacity),
            scenes: SceneStack::new(config.scene_capacity, home_timing),
            overlays: OverlayArbitrator::new(config),
            status: Status::default(),
            last_buttons: Buttons::empty(),
            source: None,
        }
    }

    /// Push the Home Menu. A second call fails with `InvalidState`.
    pub fn init(&mut self) -> Result<()> {
        self.scenes.init()?;
        log::info!(
            "Runtime initialized ({}x{}, {} apps registered)",
            self.config.screen_width,
            self.config.screen_height,
            self.registry.len()
        );
        Ok(())
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // -----------------------------------------------------------------------
    // Applications and scenes
    // -----------------------------------------------------------------------

    pub fn register_app(&mut self, app: Box<dyn Application>) -> Result<()> {
        self.registry.register(app)
    }

    /// Registered applications in registration order.
    pub fn apps(&self) -> Vec<AppInfo<'_>> {
        self.registry.apps()
    }

    /// Launch `app_id` on top of the stack.
    pub fn launch(&mut self, app_id: &str) -> Result<()> {
        let mut ctx = self.context();
        let result = self.scenes.launch(app_id, &mut self.registry, &mut ctx);
        self.apply(ctx);
        result
    }

    /// Pop the top application. Returns `false` at Home.
    pub fn go_back(&mut self) -> Result<bool> {
        let mut ctx = self.context();
        let result = self.scenes.go_back(&mut self.registry, &mut ctx);
        self.apply(ctx);
        result
    }

    /// Pop back to the Home Menu.
    pub fn go_home(&mut self) -> Result<()> {
        let mut ctx = self.context();
        let result = self.scenes.go_home(&mut self.registry, &mut ctx);
        self.apply(ctx);
        result.map(|_| ())
    }

    pub fn scene_depth(&self) -> usize {
        self.scenes.depth()
    }

    /// Id of the focused application, `None` on Home.
    pub fn active_app(&self) -> Option<&str> {
        self.scenes.top_app_id(&self.registry)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Attach the non-blocking event source drained by [`frame`](Self::frame).
    pub fn attach_source(&mut self, source: Box<dyn EventSource>) {
        self.source = Some(source);
    }

    pub fn detach_source(&mut self) -> Option<Box<dyn EventSource>> {
        self.source.take()
    }

    /// Route one event through the overlays and, if none claims it, to the
    /// active scene.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        if !self.scenes.is_initialized() {
            return Err(WristError::InvalidState("runtime not initialized".into()));
        }
        let pressed = event.buttons().rising_from(self.last_buttons);
        self.last_buttons = event.buttons();

        let now = self.clock.now_ms();
        let mut ctx = self.context().with_pressed(pressed);
        match self.overlays.route_input(event, pressed, now, &mut ctx) {
            Routed::Consumed => {},
            Routed::GoHome => {
                self.scenes.go_home(&mut self.registry, &mut ctx)?;
            },
            Routed::GoBack => {
                self.scenes.go_back(&mut self.registry, &mut ctx)?;
            },
            Routed::Scene => {
                self.scenes
                    .dispatch_input(event, now, &mut self.registry, &mut ctx);
            },
        }
        self.apply(ctx);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Loop
    // -----------------------------------------------------------------------

    /// Advance notification timers and tick every application.
    pub fn tick(&mut self, dt_ms: u64) {
        self.overlays.tick(self.clock.now_ms());
        let mut ctx = self.context();
        self.scenes.tick(dt_ms, &mut self.registry, &mut ctx);
        self.apply(ctx);
    }

    /// Compose and present one frame.
    pub fn render(&mut self, display: &mut dyn Display) -> Result<()> {
        compositor::compose(
            display,
            FrameParts {
                status: &self.status,
                scenes: &mut self.scenes,
                registry: &mut self.registry,
                overlays: &self.overlays,
            },
            &self.config,
        )
    }

    /// One loop iteration: at most one pending event, timers, ticks, render.
    pub fn frame(&mut self, display: &mut dyn Display, dt_ms: u64) -> Result<()> {
        let event = self.source.as_mut().and_then(|s| s.next_event());
        if let Some(event) = event {
            self.handle_input(&event)?;
        }
        self.tick(dt_ms);
        self.render(display)
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    /// Show `notification`, replacing any current one, and bump the unread
    /// count.
    pub fn notify(&mut self, notification: Notification) -> Result<()> {
        self.overlays.notify(notification, self.clock.now_ms())?;
        self.status.unread_notifications = self.status.unread_notifications.saturating_add(1);
        Ok(())
    }

    pub fn notify_simple(&mut self, text: &str) -> Result<()> {
        self.notify(Notification::new(text))
    }

    pub fn dismiss_notification(&mut self) {
        self.overlays.dismiss_notification();
    }

    pub fn notification_active(&self) -> bool {
        self.overlays.notification().is_active()
    }

    /// Title of the visible notification.
    pub fn notification_title(&self) -> Option<&str> {
        self.overlays.notification().current().map(|n| n.title())
    }

    pub fn show_dialog(&mut self, dialog: Dialog) -> Result<()> {
        let mut ctx = self.context();
        let result = self.overlays.show_dialog(dialog, &mut ctx);
        self.apply(ctx);
        result
    }

    /// Close the open dialog without a selection. Returns whether one was open.
    pub fn close_dialog(&mut self) -> bool {
        let mut ctx = self.context();
        let closed = self.overlays.close_dialog(&mut ctx);
        self.apply(ctx);
        closed
    }

    pub fn dialog_active(&self) -> bool {
        self.overlays.dialog().is_some()
    }

    pub fn show_osk(&mut self, request: OskRequest) {
        let mut ctx = self.context();
        self.overlays.show_osk(request, &mut ctx);
        self.apply(ctx);
    }

    pub fn osk_active(&self) -> bool {
        self.overlays.osk_active()
    }

    /// Text currently in the keyboard buffer.
    pub fn osk_text(&self) -> Option<&str> {
        self.overlays.osk().map(|o| o.state().text())
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    pub fn update_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    // -----------------------------------------------------------------------
    // Request application
    // -----------------------------------------------------------------------

    fn context(&self) -> AppContext {
        AppContext::new(self.clock.now_ms(), self.status)
    }

    /// Apply the requests queued on `ctx`, and any queued while applying
    /// them, oldest first.
    fn apply(&mut self, mut ctx: AppContext) {
        let mut queue: VecDeque<UiRequest> = ctx.take_requests().into();
        let mut applied = 0;
        while let Some(request) = queue.pop_front() {
            if applied == MAX_REQUESTS_PER_CALL {
                log::warn!("Dropping {} UI requests queued in one call", queue.len() + 1);
                break;
            }
            applied += 1;
            let mut ctx = self.context();
            self.apply_one(request, &mut ctx);
            queue.extend(ctx.take_requests());
        }
    }

    fn apply_one(&mut self, request: UiRequest, ctx: &mut AppContext) {
        log::trace!("Applying {request:?}");
        match request {
            UiRequest::Launch(app_id) => {
                if let Err(e) = self.scenes.launch(&app_id, &mut self.registry, ctx) {
                    log::warn!("Launch of '{app_id}' failed: {e}");
                    if let Err(e) = self.notify(Notification::new(LAUNCH_FAILED_TEXT)) {
                        log::warn!("Could not report failed launch: {e}");
                    }
                }
            },
            UiRequest::Back => {
                if let Err(e) = self.scenes.go_back(&mut self.registry, ctx) {
                    log::warn!("Back failed: {e}");
                }
            },
            UiRequest::Home => {
                if let Err(e) = self.scenes.go_home(&mut self.registry, ctx) {
                    log::warn!("Home failed: {e}");
                }
            },
            UiRequest::Notify(notification) => {
                if let Err(e) = self.notify(notification) {
                    log::warn!("Notification rejected: {e}");
                }
            },
            UiRequest::DismissNotification => self.overlays.dismiss_notification(),
            UiRequest::ShowDialog(dialog) => {
                if let Err(e) = self.overlays.show_dialog(dialog, ctx) {
                    log::warn!("Dialog rejected: {e}");
                }
            },
            UiRequest::CloseDialog => {
                self.overlays.close_dialog(ctx);
            },
            UiRequest::ShowOsk(request) => self.overlays.show_osk(request, ctx),
            UiRequest::UpdateStatus(update) => update(&mut self.status),
        }
    }
}

#[cfg(test)]
mod tests;
