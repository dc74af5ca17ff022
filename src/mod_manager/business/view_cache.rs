use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub type AnyStateData = Arc<dyn Any + Send + Sync>;

/// Well-known slots.
pub mod keys {
    pub const SEARCH_QUERY: &str = "search_query";
    pub const SEARCH_DATA: &str = "search_data";
    pub const SEARCH_TYPES: &str = "search_types";
    pub const SEARCH_CATEGORIES: &str = "search_categories";
    pub const SEARCH_SCROLL_POSITION: &str = "search_scroll_position";
    pub const SEARCH_SORT_ORDER: &str = "search_sort_order";
    pub const SEARCH_PAGE: &str = "search_page";
    pub const GAME_STATUS: &str = "game_status";

    pub fn profile(name: &str) -> String {
        name.to_string()
    }

    pub fn profile_mods(name: &str) -> String {
        format!("{name}_mods")
    }

    pub fn profile_page(name: &str) -> String {
        format!("{name}_search_page")
    }
}

/// Last known value of named view-state slices for the lifetime of the app.
///
/// Clones share the same storage. Nothing is written to disk.
#[derive(Clone, Default)]
pub struct ViewStateCache {
    slots: Arc<RwLock<HashMap<String, AnyStateData>>>,
}

impl ViewStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T>(&self, key: &str, default: T) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        self.get_opt(key).unwrap_or(default)
    }

    pub fn get_opt<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slots = self.slots.read();
        let data = slots.get(key)?;
        match data.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                log::warn!(
                    "View state `{key}` holds a different type than {}",
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    pub fn set<T>(&self, key: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.slots
            .write()
            .insert(key.to_string(), Arc::new(value) as AnyStateData);
    }

    /// Read-modify-write under a single lock.
    pub fn update<T, R, F>(&self, key: &str, default: T, f: F) -> R
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&mut T) -> R,
    {
        let mut slots = self.slots.write();
        let mut value = slots
            .get(key)
            .and_then(|data| data.downcast_ref::<T>())
            .cloned()
            .unwrap_or(default);
        let result = f(&mut value);
        slots.insert(key.to_string(), Arc::new(value) as AnyStateData);
        result
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) {
        self.slots.write().remove(key);
    }

    /// Drops every slot; used when the owning handler shuts down.
    pub fn clear(&self) {
        self.slots.write().clear();
    }

    pub fn slot<T>(&self, key: impl Into<String>, default: T) -> Persisted<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Persisted {
            cache: self.clone(),
            key: key.into(),
            default,
        }
    }
}

/// A typed handle to one slot of the cache.
#[derive(Clone)]
pub struct Persisted<T> {
    cache: ViewStateCache,
    key: String,
    default: T,
}

impl<T> Persisted<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn get(&self) -> T {
        self.cache.get(&self.key, self.default.clone())
    }

    pub fn set(&self, value: T) {
        self.cache.set(&self.key, value);
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_after_set_returns_value() {
        let cache = ViewStateCache::new();
        assert_eq!(cache.get(keys::SEARCH_QUERY, String::new()), "");

        cache.set(keys::SEARCH_QUERY, "lethal".to_string());
        assert_eq!(cache.get(keys::SEARCH_QUERY, String::new()), "lethal");
    }

    #[test]
    fn test_keys_do_not_interfere() {
        let cache = ViewStateCache::new();
        cache.set(keys::SEARCH_PAGE, 3usize);
        cache.set(&keys::profile_page("Main"), 2usize);

        assert_eq!(cache.get(keys::SEARCH_PAGE, 0usize), 3);
        assert_eq!(cache.get(&keys::profile_page("Main"), 1usize), 2);
        assert_eq!(cache.get(&keys::profile_page("Other"), 1usize), 1);
    }

    #[test]
    fn test_type_mismatch_falls_back_to_default() {
        let cache = ViewStateCache::new();
        cache.set(keys::SEARCH_SCROLL_POSITION, 120.0f32);
        assert_eq!(cache.get(keys::SEARCH_SCROLL_POSITION, 7usize), 7);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ViewStateCache::new();
        let other = cache.clone();
        other.set("k", 1u8);
        assert!(cache.contains("k"));

        cache.clear();
        assert!(!other.contains("k"));
    }

    #[test]
    fn test_update_and_slot() {
        let cache = ViewStateCache::new();
        let doubled = cache.update("counter", 2u32, |v| {
            *v *= 2;
            *v
        });
        assert_eq!(doubled, 4);

        let slot = cache.slot("counter", 0u32);
        assert_eq!(slot.get(), 4);
        slot.set(9);
        assert_eq!(cache.get("counter", 0u32), 9);

        cache.remove("counter");
        assert_eq!(slot.get(), 0);
    }

    #[test]
    fn test_profile_keys() {
        assert_eq!(keys::profile("Main"), "Main");
        assert_eq!(keys::profile_mods("Main"), "Main_mods");
        assert_eq!(keys::profile_page("Main"), "Main_search_page");
    }
}
