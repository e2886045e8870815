//! Fixed-capacity application registry.

use wrist_types::error::{Result, WristError};

use crate::app::Application;

/// Listing entry for a registered application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon: Option<&'a [u8]>,
}

/// Registered applications in registration order.
///
/// Applications live here for the lifetime of the runtime; the scene stack
/// refers to them by index.
pub struct AppRegistry {
    apps: Vec<Box<dyn Application>>,
    capacity: usize,
}

impl AppRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            apps: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Register an application.
    ///
    /// Rejects an empty id or name and a duplicate id with `InvalidArgument`,
    /// and a full registry with `CapacityExceeded`. Nothing is changed on
    /// failure.
    pub fn register(&mut self, app: Box<dyn Application>) -> Result<()> {
        if app.id().is_empty() || app.name().is_empty() {
            return Err(WristError::InvalidArgument(
                "application id and name must not be empty".into(),
            ));
        }
        if self.index_of(app.id()).is_some() {
            return Err(WristError::InvalidArgument(format!(
                "application '{}' already registered",
                app.id()
            )));
        }
        if self.apps.len() >= self.capacity {
            return Err(WristError::CapacityExceeded(format!(
                "application registry full ({} apps)",
                self.capacity
            )));
        }
        log::info!("Registered app: {}", app.name());
        self.apps.push(app);
        Ok(())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.apps.iter().position(|a| a.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&dyn Application> {
        self.apps.get(index).map(|a| &**a)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Application + 'static)> {
        self.apps.get_mut(index).map(|a| &mut **a)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Application>> {
        self.apps.iter_mut()
    }

    /// Registered applications in registration order.
    pub fn apps(&self) -> Vec<AppInfo<'_>> {
        self.apps
            .iter()
            .map(|a| AppInfo {
                id: a.id(),
                name: a.name(),
                icon: a.icon(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppContext;
    use wrist_types::display::Display;
    use wrist_types::input::InputEvent;

    struct Stub {
        id: String,
        name: String,
    }

    impl Application for Stub {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn on_input(&mut self, _event: &InputEvent, _ctx: &mut AppContext) {}

        fn on_render(&mut self, _display: &mut dyn Display) -> Result<()> {
            Ok(())
        }
    }

    fn stub(id: &str) -> Box<dyn Application> {
        Box::new(Stub {
            id: id.into(),
            name: id.to_uppercase(),
        })
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = AppRegistry::new(4);
        reg.register(stub("notes")).unwrap();
        reg.register(stub("music")).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.index_of("music"), Some(1));
        assert_eq!(reg.index_of("ghost"), None);
        assert_eq!(reg.get(0).unwrap().name(), "NOTES");
    }

    #[test]
    fn listing_keeps_registration_order() {
        let mut reg = AppRegistry::new(4);
        for id in ["c", "a", "b"] {
            reg.register(stub(id)).unwrap();
        }
        let ids: Vec<&str> = reg.apps().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(reg.apps().iter().all(|a| a.icon.is_none()));
    }

    #[test]
    fn capacity_enforced() {
        let mut reg = AppRegistry::new(2);
        reg.register(stub("a")).unwrap();
        reg.register(stub("b")).unwrap();
        let err = reg.register(stub("c")).unwrap_err();
        assert!(matches!(err, WristError::CapacityExceeded(_)));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn empty_id_rejected() {
        let mut reg = AppRegistry::new(2);
        let err = reg.register(stub("")).unwrap_err();
        assert!(matches!(err, WristError::InvalidArgument(_)));
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut reg = AppRegistry::new(4);
        reg.register(stub("notes")).unwrap();
        let err = reg.register(stub("notes")).unwrap_err();
        assert!(matches!(err, WristError::InvalidArgument(_)));
        assert_eq!(reg.len(), 1);
    }
}
