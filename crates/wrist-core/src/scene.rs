//! Scene stack -- Home Menu at the bottom, launched applications above it.

use wrist_types::display::Display;
use wrist_types::error::{Result, WristError};
use wrist_types::input::InputEvent;

use crate::app::AppContext;
use crate::home::HomeMenu;
use crate::nav::NavTiming;
use crate::registry::AppRegistry;

/// A stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Home,
    /// Registry index of a running application.
    App(usize),
}

/// Bounded stack of scenes. Entry 0 is always Home once initialized.
#[derive(Debug)]
pub struct SceneStack {
    entries: Vec<Scene>,
    capacity: usize,
    home: HomeMenu,
}

impl SceneStack {
    /// `capacity` counts the Home entry.
    pub fn new(capacity: usize, home_timing: NavTiming) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            home: HomeMenu::new(home_timing),
        }
    }

    /// Push the Home Menu. Fails with `InvalidState` when already done.
    pub fn init(&mut self) -> Result<()> {
        if !self.entries.is_empty() {
            return Err(WristError::InvalidState("scene stack already initialized".into()));
        }
        self.entries.push(Scene::Home);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        !self.entries.is_empty()
    }

    fn require_init(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(WristError::InvalidState("scene stack not initialized".into()));
        }
        Ok(())
    }

    /// Push the application registered as `app_id` and run its `on_enter`.
    pub fn launch(
        &mut self,
        app_id: &str,
        registry: &mut AppRegistry,
        ctx: &mut AppContext,
    ) -> Result<()> {
        self.require_init()?;
        let index = registry
            .index_of(app_id)
            .ok_or_else(|| WristError::NotFound(format!("no application '{app_id}'")))?;
        if self.entries.contains(&Scene::App(index)) {
            return Err(WristError::InvalidState(format!(
                "application '{app_id}' is already running"
            )));
        }
        if self.entries.len() >= self.capacity {
            return Err(WristError::CapacityExceeded(format!(
                "scene stack full ({} entries)",
                self.capacity
            )));
        }

        if let Some(app) = registry.get_mut(index) {
            if let Err(e) = app.on_enter(ctx) {
                // Stays pushed so on_exit still pairs with this enter.
                log::error!("App '{app_id}' failed to enter: {e}");
            }
        }
        self.entries.push(Scene::App(index));
        log::info!("Launched app: {app_id} (depth {})", self.entries.len());
        Ok(())
    }

    /// Pop the top application. Returns `false` when only Home remains.
    pub fn go_back(&mut self, registry: &mut AppRegistry, ctx: &mut AppContext) -> Result<bool> {
        self.require_init()?;
        if self.entries.len() <= 1 {
            return Ok(false);
        }
        if let Some(Scene::App(index)) = self.entries.pop() {
            if let Some(app) = registry.get_mut(index) {
                app.on_exit(ctx);
                log::debug!("Exited app: {}", app.id());
            }
        }
        Ok(true)
    }

    /// Pop everything above Home. Returns the number of scenes popped.
    pub fn go_home(&mut self, registry: &mut AppRegistry, ctx: &mut AppContext) -> Result<usize> {
        let mut popped = 0;
        while self.go_back(registry, ctx)? {
            popped += 1;
        }
        Ok(popped)
    }

    /// Deliver `event` to the top scene only.
    pub fn dispatch_input(
        &mut self,
        event: &InputEvent,
        now: u64,
        registry: &mut AppRegistry,
        ctx: &mut AppContext,
    ) {
        match self.entries.last() {
            Some(Scene::Home) => {
                let pressed = ctx.pressed();
                if let Some(index) = self.home.handle_input(event, pressed, now, registry.len()) {
                    if let Some(app) = registry.get(index) {
                        ctx.launch(app.id());
                    }
                }
            },
            Some(&Scene::App(index)) => {
                if let Some(app) = registry.get_mut(index) {
                    app.on_input(event, ctx);
                }
            },
            None => {},
        }
    }

    /// Draw the top scene into the content area starting at `top`.
    pub fn render(
        &mut self,
        display: &mut dyn Display,
        registry: &mut AppRegistry,
        width: i32,
        top: i32,
    ) -> Result<()> {
        match self.entries.last() {
            Some(Scene::Home) => self.home.render(display, &registry.apps(), width, top),
            Some(&Scene::App(index)) => match registry.get_mut(index) {
                Some(app) => app.on_render(display),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// Tick every registered application, running or not.
    pub fn tick(&mut self, dt_ms: u64, registry: &mut AppRegistry, ctx: &mut AppContext) {
        for app in registry.iter_mut() {
            app.on_tick(dt_ms, ctx);
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn top(&self) -> Option<Scene> {
        self.entries.last().copied()
    }

    /// Id of the focused application, `None` on Home.
    pub fn top_app_id<'a>(&self, registry: &'a AppRegistry) -> Option<&'a str> {
        match self.top()? {
            Scene::Home => None,
            Scene::App(index) => registry.get(index).map(|a| a.id()),
        }
    }

    pub fn home(&self) -> &HomeMenu {
        &self.home
    }
}
