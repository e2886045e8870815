//! Overlay arbitration.
//!
//! At most one notification, one dialog and one keyboard are alive at a
//! time. Input precedence, highest first: keyboard, dialog, notification
//! dismissal, then the scene stack. Home and Back are handled before any of
//! those. Rendering runs the other way so the notification ends up on top.

pub mod dialog;
pub mod notification;

use wrist_types::config::UiConfig;
use wrist_types::display::Display;
use wrist_types::error::Result;
use wrist_types::input::{Buttons, InputEvent};

use crate::app::AppContext;
use crate::nav::NavTiming;
use crate::osk::{ActiveOsk, OskInput, OskRequest};

use dialog::{Dialog, DialogOutcome, DialogState};
use notification::{Notification, NotificationSlot};

/// Where an input event ended up after overlay arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// An overlay consumed it.
    Consumed,
    /// Home with no keyboard or dialog open.
    GoHome,
    /// Back with no keyboard or dialog open.
    GoBack,
    /// No overlay claimed it; deliver to the active scene.
    Scene,
}

/// Owner of the three overlay slots.
pub struct OverlayArbitrator {
    notification: NotificationSlot,
    dialog: Option<DialogState>,
    osk: Option<ActiveOsk>,
    dialog_timing: NavTiming,
    osk_timing: NavTiming,
    osk_cap: usize,
    osk_visible_chars: usize,
}

impl OverlayArbitrator {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            notification: NotificationSlot::new(
                config.notify_default_ms,
                config.notify_slide_ms,
                config.notify_height,
            ),
            dialog: None,
            osk: None,
            dialog_timing: NavTiming {
                threshold: config.nav_threshold,
                nav_repeat_ms: config.dialog_nav_repeat_ms,
                press_debounce_ms: config.dialog_press_debounce_ms,
            },
            osk_timing: NavTiming {
                threshold: config.nav_threshold,
                nav_repeat_ms: config.osk_nav_repeat_ms,
                press_debounce_ms: config.osk_press_debounce_ms,
            },
            osk_cap: config.osk_max_length,
            osk_visible_chars: config.osk_visible_chars,
        }
    }

    // -----------------------------------------------------------------------
    // Notification
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, notification: Notification, now: u64) -> Result<()> {
        self.notification.show(notification, now)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification.dismiss();
    }

    pub fn notification(&self) -> &NotificationSlot {
        &self.notification
    }

    // -----------------------------------------------------------------------
    // Dialog
    // -----------------------------------------------------------------------

    /// Open `dialog`. A dialog already open is dismissed first, but only
    /// once the new one has been validated.
    pub fn show_dialog(&mut self, dialog: Dialog, ctx: &mut AppContext) -> Result<()> {
        let state = DialogState::open(dialog, self.dialog_timing)?;
        if let Some(previous) = self.dialog.take() {
            previous.finish(DialogOutcome::Dismissed, ctx);
        }
        self.dialog = Some(state);
        Ok(())
    }

    /// Close the open dialog without a selection. Returns whether one was open.
    pub fn close_dialog(&mut self, ctx: &mut AppContext) -> bool {
        match self.dialog.take() {
            Some(state) => {
                state.finish(DialogOutcome::Dismissed, ctx);
                true
            },
            None => false,
        }
    }

    pub fn dialog(&self) -> Option<&DialogState> {
        self.dialog.as_ref()
    }

    // -----------------------------------------------------------------------
    // On-screen keyboard
    // -----------------------------------------------------------------------

    /// Open the keyboard. A keyboard already open is cancelled first.
    pub fn show_osk(&mut self, request: OskRequest, ctx: &mut AppContext) {
        self.cancel_osk(ctx);
        log::debug!("OSK opened: {}", request.title());
        self.osk = Some(ActiveOsk::open(
            request,
            self.osk_cap,
            self.osk_visible_chars,
            self.osk_timing,
        ));
    }

    /// Cancel the open keyboard. Returns whether one was open.
    pub fn cancel_osk(&mut self, ctx: &mut AppContext) -> bool {
        match self.osk.take() {
            Some(osk) => {
                osk.cancel(ctx);
                true
            },
            None => false,
        }
    }

    pub fn osk_active(&self) -> bool {
        self.osk.is_some()
    }

    pub fn osk(&self) -> Option<&ActiveOsk> {
        self.osk.as_ref()
    }

    // -----------------------------------------------------------------------
    // Input, timers, rendering
    // -----------------------------------------------------------------------

    /// Offer `event` to the overlays. `pressed` holds the buttons that went
    /// down with this event.
    pub fn route_input(
        &mut self,
        event: &InputEvent,
        pressed: Buttons,
        now: u64,
        ctx: &mut AppContext,
    ) -> Routed {
        if pressed.contains(Buttons::HOME) {
            return self.cancel_top(ctx).unwrap_or(Routed::GoHome);
        }
        if pressed.contains(Buttons::BACK) {
            return self.cancel_top(ctx).unwrap_or(Routed::GoBack);
        }

        if let Some(osk) = self.osk.as_mut() {
            if osk.state_mut().handle_input(event, pressed, now) == OskInput::Confirmed {
                if let Some(osk) = self.osk.take() {
                    osk.confirm(ctx);
                }
            }
            return Routed::Consumed;
        }

        if let Some(dialog) = self.dialog.as_mut() {
            if let Some(index) = dialog.handle_input(event, pressed, now) {
                if let Some(dialog) = self.dialog.take() {
                    dialog.finish(DialogOutcome::Selected(index), ctx);
                }
            }
            return Routed::Consumed;
        }

        if pressed.contains(Buttons::PRESS) && self.notification.is_active() {
            if let Some(mut n) = self.notification.dismiss() {
                if let Some(on_tap) = n.take_on_tap() {
                    on_tap(ctx);
                }
            }
            return Routed::Consumed;
        }

        Routed::Scene
    }

    /// Cancel the keyboard, else dismiss the dialog.
    fn cancel_top(&mut self, ctx: &mut AppContext) -> Option<Routed> {
        if self.cancel_osk(ctx) || self.close_dialog(ctx) {
            Some(Routed::Consumed)
        } else {
            None
        }
    }

    /// Advance timer-driven overlay state.
    pub fn tick(&mut self, now: u64) {
        self.notification.tick(now);
    }

    /// Draw the active overlays: dialog, keyboard, then notification.
    pub fn render(&self, display: &mut dyn Display, config: &UiConfig) -> Result<()> {
        let (w, h) = (config.screen_width, config.screen_height);
        if let Some(dialog) = &self.dialog {
            dialog.render(display, w, h)?;
        }
        if let Some(osk) = &self.osk {
            osk.state().render(display, config.status_bar_height, w, h)?;
        }
        self.notification.render(display, w)
    }
}
