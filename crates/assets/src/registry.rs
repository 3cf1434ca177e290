use std::collections::BTreeMap;

/// Something that can live in a [`Registry`]: it has a name and may hold
/// resources to release.
pub trait Manageable {
    fn name(&self) -> &str;

    /// Release held resources. Called by [`Registry::clean_up_all`].
    fn clean_up(&mut self) {}
}

/// Named store of shared objects.
///
/// Registering under a name that is already taken replaces the old entry
/// (last write wins). Neither replacement nor [`unregister`](Self::unregister)
/// runs the displaced entry's `clean_up`.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Manageable> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under its own name. Returns the entry it replaced.
    pub fn register(&mut self, value: T) -> Option<T> {
        let name = value.name().to_string();
        self.register_as(name, value)
    }

    /// Register `value` under `name`. Returns the entry it replaced.
    pub fn register_as(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), value);
        if previous.is_some() {
            tracing::debug!(name = %name, "registry entry replaced");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove and return the entry under `name` without cleaning it up.
    pub fn unregister(&mut self, name: &str) -> Option<T> {
        self.entries.remove(name)
    }

    /// Clean up every entry, then empty the registry.
    pub fn clean_up_all(&mut self) {
        let count = self.entries.len();
        for value in self.entries.values_mut() {
            value.clean_up();
        }
        self.entries.clear();
        tracing::debug!(count, "registry cleaned up");
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Handle {
        name: String,
        value: u32,
        cleaned: Rc<Cell<u32>>,
    }

    impl Handle {
        fn new(name: &str, value: u32, cleaned: &Rc<Cell<u32>>) -> Self {
            Self {
                name: name.into(),
                value,
                cleaned: cleaned.clone(),
            }
        }
    }

    impl Manageable for Handle {
        fn name(&self) -> &str {
            &self.name
        }

        fn clean_up(&mut self) {
            self.cleaned.set(self.cleaned.get() + 1);
        }
    }

    #[test]
    fn last_write_wins() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        assert!(registry.register(Handle::new("default", 1, &cleaned)).is_none());
        let displaced = registry.register(Handle::new("default", 2, &cleaned));

        assert_eq!(displaced.map(|h| h.value), Some(1));
        assert_eq!(registry.get("default").map(|h| h.value), Some(2));
        assert_eq!(registry.len(), 1);
        assert_eq!(cleaned.get(), 0);
    }

    #[test]
    fn register_as_uses_given_name() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register_as("alias", Handle::new("brick", 1, &cleaned));
        assert!(registry.get("brick").is_none());
        assert!(registry.contains("alias"));
    }

    #[test]
    fn missing_name_is_absent() {
        let registry: Registry<Handle> = Registry::new();
        assert!(registry.get("nothing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_skips_clean_up() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register(Handle::new("brick", 1, &cleaned));

        let removed = registry.unregister("brick");
        assert!(removed.is_some());
        assert!(registry.get("brick").is_none());
        assert!(registry.unregister("brick").is_none());
        assert_eq!(cleaned.get(), 0);
    }

    #[test]
    fn clean_up_all_cleans_each_then_clears() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register(Handle::new("a", 1, &cleaned));
        registry.register(Handle::new("b", 2, &cleaned));
        registry.register(Handle::new("c", 3, &cleaned));

        registry.clean_up_all();
        assert_eq!(cleaned.get(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register(Handle::new("zeta", 1, &cleaned));
        registry.register(Handle::new("alpha", 2, &cleaned));
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let cleaned = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register(Handle::new("a", 1, &cleaned));
        if let Some(handle) = registry.get_mut("a") {
            handle.value = 10;
        }
        assert_eq!(registry.get("a").map(|h| h.value), Some(10));
    }
}
