//! Settings: radio toggles, an About box and a status reset.

use wrist_core::menu_list::{MenuItem, MenuList};
use wrist_core::{AppContext, Application, Dialog};
use wrist_types::config::UiConfig;
use wrist_types::display::{DISPLAY_WIDTH, Display};
use wrist_types::error::Result;
use wrist_types::input::InputEvent;
use wrist_types::status::Status;

const LIST_TOP: i32 = 12;
const LIST_HEIGHT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Wifi,
    Bluetooth,
    About,
    Reset,
}

const ENTRIES: [Entry; 4] = [Entry::Wifi, Entry::Bluetooth, Entry::About, Entry::Reset];

fn on_off(on: bool) -> &'static str {
    if on { "On" } else { "Off" }
}

pub struct SettingsApp {
    list: MenuList,
    /// Status as of the last callback, used for the item labels.
    status: Status,
}

impl SettingsApp {
    pub fn new(config: &UiConfig) -> Self {
        let status = Status::default();
        Self {
            list: MenuList::new(Self::items(&status), crate::list_timing(config)),
            status,
        }
    }

    fn items(status: &Status) -> Vec<MenuItem> {
        ENTRIES
            .iter()
            .map(|entry| {
                MenuItem::new(match entry {
                    Entry::Wifi => format!("Wi-Fi: {}", on_off(status.wifi_connected)),
                    Entry::Bluetooth => format!("Bluetooth: {}", on_off(status.ble_connected)),
                    Entry::About => "About".to_string(),
                    Entry::Reset => "Reset".to_string(),
                })
            })
            .collect()
    }

    fn observe(&mut self, status: Status) {
        if status != self.status {
            self.status = status;
            self.list.set_items(Self::items(&status));
        }
    }

    fn activate(&mut self, entry: Entry, ctx: &mut AppContext) {
        match entry {
            Entry::Wifi => {
                let on = !ctx.status().wifi_connected;
                ctx.update_status(move |s| {
                    s.wifi_connected = on;
                    s.wifi_rssi = if on { -55 } else { 0 };
                });
                ctx.notify_simple(format!("Wi-Fi {}", on_off(on)));
                self.observe(*ctx.status());
            },
            Entry::Bluetooth => {
                let on = !ctx.status().ble_connected;
                ctx.update_status(move |s| s.ble_connected = on);
                ctx.notify_simple(format!("Bluetooth {}", on_off(on)));
                self.observe(*ctx.status());
            },
            Entry::About => {
                ctx.show_dialog(
                    Dialog::new("About", concat!("wrist-ui ", env!("CARGO_PKG_VERSION")))
                        .plain_button("OK"),
                );
            },
            Entry::Reset => {
                let dialog = Dialog::new("Reset", "Clear radios?")
                    .button("Yes", |ctx| {
                        ctx.update_status(|s| {
                            s.wifi_connected = false;
                            s.wifi_rssi = 0;
                            s.ble_connected = false;
                        });
                        ctx.notify_simple("Settings reset");
                    })
                    .plain_button("No")
                    .default_button(1);
                ctx.show_dialog(dialog);
            },
        }
    }
}

impl Application for SettingsApp {
    fn id(&self) -> &str {
        "settings"
    }

    fn name(&self) -> &str {
        "Settings"
    }

    fn on_enter(&mut self, ctx: &mut AppContext) -> Result<()> {
        self.observe(*ctx.status());
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut AppContext) {
        self.observe(*ctx.status());
        if let Some(entry) = self
            .list
            .handle_input(event, ctx.pressed(), ctx.now_ms())
            .and_then(|i| ENTRIES.get(i).copied())
        {
            self.activate(entry, ctx);
        }
    }

    fn on_render(&mut self, display: &mut dyn Display) -> Result<()> {
        self.list.draw(display, 0, LIST_TOP, DISPLAY_WIDTH, LIST_HEIGHT)
    }

    fn on_tick(&mut self, _dt_ms: u64, ctx: &mut AppContext) {
        self.observe(*ctx.status());
    }
}
