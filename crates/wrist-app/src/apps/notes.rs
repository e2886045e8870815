//! Notes: a list of short text notes entered with the on-screen keyboard.

use std::cell::RefCell;
use std::rc::Rc;

use wrist_core::menu_list::{MenuItem, MenuList};
use wrist_core::{AppContext, Application, Dialog, OskOutcome, OskRequest};
use wrist_types::config::UiConfig;
use wrist_types::display::{DISPLAY_WIDTH, Display};
use wrist_types::error::Result;
use wrist_types::input::InputEvent;

use crate::icons;

const NEW_NOTE_LABEL: &str = "+ New note";
const NOTE_MAX_LENGTH: usize = 32;
const LIST_TOP: i32 = 12;
const LIST_HEIGHT: i32 = 50;

#[derive(Debug, Default)]
struct NoteStore {
    notes: Vec<String>,
    changed: bool,
}

/// Shared between the app and the keyboard/dialog callbacks it hands out.
type SharedStore = Rc<RefCell<NoteStore>>;

pub struct NotesApp {
    store: SharedStore,
    list: MenuList,
}

impl NotesApp {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            store: SharedStore::default(),
            list: MenuList::new(vec![MenuItem::new(NEW_NOTE_LABEL)], crate::list_timing(config)),
        }
    }

    pub fn notes(&self) -> Vec<String> {
        self.store.borrow().notes.clone()
    }

    fn sync_items(&mut self) {
        let mut store = self.store.borrow_mut();
        if !store.changed {
            return;
        }
        store.changed = false;
        let items = std::iter::once(MenuItem::new(NEW_NOTE_LABEL))
            .chain(store.notes.iter().map(|n| MenuItem::new(n.as_str())))
            .collect();
        self.list.set_items(items);
    }

    fn new_note(&self, ctx: &mut AppContext) {
        let store = Rc::clone(&self.store);
        let request = OskRequest::new("New note", move |outcome, ctx| {
            let OskOutcome::Confirmed(text) = outcome else {
                return;
            };
            let text = text.trim().to_string();
            if text.is_empty() {
                return;
            }
            let mut store = store.borrow_mut();
            store.notes.push(text);
            store.changed = true;
            ctx.notify_simple("Note saved");
        })
        .max_length(NOTE_MAX_LENGTH);
        ctx.show_osk(request);
    }

    fn open_note(&self, index: usize, ctx: &mut AppContext) {
        let Some(text) = self.store.borrow().notes.get(index).cloned() else {
            return;
        };
        let store = Rc::clone(&self.store);
        let dialog = Dialog::new("Note", text)
            .plain_button("Close")
            .button("Delete", move |ctx| {
                let mut store = store.borrow_mut();
                if index < store.notes.len() {
                    store.notes.remove(index);
                    store.changed = true;
                    ctx.notify_simple("Note deleted");
                }
            });
        ctx.show_dialog(dialog);
    }
}

impl Application for NotesApp {
    fn id(&self) -> &str {
        "notes"
    }

    fn name(&self) -> &str {
        "Notes"
    }

    fn icon(&self) -> Option<&[u8]> {
        Some(icons::NOTES.as_slice())
    }

    fn on_enter(&mut self, _ctx: &mut AppContext) -> Result<()> {
        self.list.select(0);
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut AppContext) {
        match self.list.handle_input(event, ctx.pressed(), ctx.now_ms()) {
            Some(0) => self.new_note(ctx),
            Some(i) => self.open_note(i - 1, ctx),
            None => {},
        }
    }

    fn on_render(&mut self, display: &mut dyn Display) -> Result<()> {
        self.sync_items();
        self.list.draw(display, 0, LIST_TOP, DISPLAY_WIDTH, LIST_HEIGHT)
    }

    fn on_tick(&mut self, _dt_ms: u64, _ctx: &mut AppContext) {
        self.sync_items();
    }
}
