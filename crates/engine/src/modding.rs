use std::collections::BTreeSet;

use crate::EngineError;
use crate::context::EngineContext;

/// Identity and metadata of a mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRegistration {
    pub display_name: String,
    /// Unique key among loaded mods.
    pub registry_name: String,
    pub description: String,
    pub author: String,
    pub version: String,
}

impl ModRegistration {
    pub fn new(display_name: impl Into<String>, registry_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            registry_name: registry_name.into(),
            description: String::new(),
            author: "Unknown".into(),
            version: "Unknown".into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Extension hooked into the engine lifecycle.
///
/// Mods reach the engine only through the [`EngineContext`]: they create
/// nodes, attach components, declare requirements and use the event bus.
pub trait Mod {
    fn registration(&self) -> ModRegistration;

    fn pre_initialize(&mut self, _ctx: &mut EngineContext) -> Result<(), EngineError> {
        Ok(())
    }

    fn initialize(&mut self, _ctx: &mut EngineContext) -> Result<(), EngineError> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut EngineContext) {}

    fn clean_up(&mut self, _ctx: &mut EngineContext) {}
}

struct LoadedMod {
    registration: ModRegistration,
    instance: Box<dyn Mod>,
}

/// Loaded mods, run in registration order.
#[derive(Default)]
pub struct ModManager {
    mods: Vec<LoadedMod>,
    names: BTreeSet<String>,
}

impl ModManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mod. Fails if its registry name is already taken.
    pub fn register(&mut self, instance: Box<dyn Mod>) -> Result<(), EngineError> {
        let registration = instance.registration();
        if !self.names.insert(registration.registry_name.clone()) {
            return Err(EngineError::DuplicateMod(registration.registry_name));
        }
        tracing::info!(
            name = %registration.display_name,
            author = %registration.author,
            version = %registration.version,
            "loaded mod"
        );
        self.mods.push(LoadedMod {
            registration,
            instance,
        });
        Ok(())
    }

    pub fn registrations(&self) -> impl Iterator<Item = &ModRegistration> {
        self.mods.iter().map(|m| &m.registration)
    }

    pub fn contains(&self, registry_name: &str) -> bool {
        self.names.contains(registry_name)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn pre_initialize(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        for loaded in &mut self.mods {
            let _span = tracing::debug_span!("mod_pre_initialize", name = %loaded.registration.registry_name).entered();
            loaded.instance.pre_initialize(ctx)?;
        }
        Ok(())
    }

    pub fn initialize(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        for loaded in &mut self.mods {
            let _span = tracing::debug_span!("mod_initialize", name = %loaded.registration.registry_name).entered();
            loaded.instance.initialize(ctx)?;
        }
        Ok(())
    }

    pub fn update(&mut self, ctx: &mut EngineContext) {
        for loaded in &mut self.mods {
            loaded.instance.update(ctx);
        }
    }

    /// Run every mod's clean-up, then unload them all.
    pub fn clean_up(&mut self, ctx: &mut EngineContext) {
        for loaded in &mut self.mods {
            loaded.instance.clean_up(ctx);
        }
        self.mods.clear();
        self.names.clear();
    }
}

impl std::fmt::Debug for ModManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.mods.iter().map(|m| &m.registration.registry_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Mod for Recorder {
        fn registration(&self) -> ModRegistration {
            ModRegistration::new(self.name, self.name.to_lowercase())
                .author("tests")
                .version("1.0")
        }

        fn pre_initialize(&mut self, _ctx: &mut EngineContext) -> Result<(), EngineError> {
            self.log.borrow_mut().push(format!("pre:{}", self.name));
            Ok(())
        }

        fn update(&mut self, _ctx: &mut EngineContext) {
            self.log.borrow_mut().push(format!("update:{}", self.name));
        }

        fn clean_up(&mut self, _ctx: &mut EngineContext) {
            self.log.borrow_mut().push(format!("clean:{}", self.name));
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Mod> {
        Box::new(Recorder {
            name,
            log: log.clone(),
        })
    }

    #[test]
    fn registration_defaults() {
        let r = ModRegistration::new("Core", "core");
        assert_eq!(r.author, "Unknown");
        assert_eq!(r.version, "Unknown");
        assert!(r.description.is_empty());
    }

    #[test]
    fn duplicate_registry_name_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mods = ModManager::new();
        mods.register(recorder("Core", &log)).unwrap();
        let err = mods.register(recorder("Core", &log)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMod(name) if name == "core"));
        assert_eq!(mods.len(), 1);
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mods = ModManager::new();
        mods.register(recorder("Zeta", &log)).unwrap();
        mods.register(recorder("Alpha", &log)).unwrap();
        let mut ctx = EngineContext::new();

        mods.pre_initialize(&mut ctx).unwrap();
        mods.update(&mut ctx);
        mods.clean_up(&mut ctx);
        assert_eq!(
            *log.borrow(),
            vec![
                "pre:Zeta",
                "pre:Alpha",
                "update:Zeta",
                "update:Alpha",
                "clean:Zeta",
                "clean:Alpha"
            ]
        );
        assert!(mods.is_empty());
        assert!(!mods.contains("zeta"));
    }
}
