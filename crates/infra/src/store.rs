use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use fxcrm_auth::OfficeFilter;
use fxcrm_core::OwnedByOffice;

/// In-memory entity store.
///
/// Each call acquires the lock once; there is no cross-call coordination
/// (requests are independent and the stores are the only shared state).
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    pub fn upsert(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut map = self.inner.write().ok()?;
        map.remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().map(|map| map.contains_key(key)).unwrap_or(false)
    }

    /// All records matching `predicate`.
    pub fn find_where(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().filter(|v| predicate(v)).cloned().collect()
    }

    pub fn count_where(&self, predicate: impl Fn(&V) -> bool) -> usize {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return 0,
        };
        map.values().filter(|v| predicate(v)).count()
    }
}

impl<K, V> InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + OwnedByOffice + Send + Sync + 'static,
{
    /// Office-constrained listing: the scope filter is applied inside the
    /// query, so out-of-scope rows never leave the store.
    pub fn list_in_scope(&self, filter: &OfficeFilter) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values()
            .filter(|v| filter.permits(v.owning_office()))
            .cloned()
            .collect()
    }
}
