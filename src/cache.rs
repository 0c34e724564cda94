//! Bounded memoization at the editor boundary.
//!
//! The parsers themselves are pure and keep no state. Hosts that re-query
//! the same line or template on every keystroke can put one of these in
//! front of them.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};
use log::{debug, trace};

use crate::config::{ConfigError, DEFAULT_CACHE_CAPACITY};
use crate::detector::{ExpressionContext, get_context};
use crate::template::{TemplateProperty, parse_template};

/// Least-recently-used map. Insertion order in the backing [`IndexMap`]
/// is recency order: the front is evicted first.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: usize,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        })
    }

    /// Look up `key`, marking it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let index = self.touch(key)?;
        self.entries.get_index(index).map(|(_, value)| value)
    }

    /// Value for `key`, built by `make` and inserted on a miss. Either way
    /// the entry ends up most recently used.
    pub fn get_or_insert_with<Q>(&mut self, key: &Q, make: impl FnOnce() -> V) -> &V
    where
        Q: ?Sized + Hash + Equivalent<K> + ToOwned<Owned = K>,
    {
        let index = self.touch(key).unwrap_or_else(|| {
            if self.entries.len() >= self.capacity {
                self.evict();
            }
            self.entries.insert_full(key.to_owned(), make()).0
        });
        &self.entries[index]
    }

    /// Look up `key` without touching recency.
    #[must_use]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.contains_key(key)
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.entries.shift_remove(&key);
        self.entries.insert(key, value);
        if self.entries.len() > self.capacity {
            self.evict();
        }
        previous
    }

    /// Move `key` to the back, returning its new index.
    fn touch<Q>(&mut self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        Some(last)
    }

    fn evict(&mut self) {
        self.entries.shift_remove_index(0);
        debug!("evicted least recently used entry (capacity {})", self.capacity);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Hash + Eq, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::with_capacity(DEFAULT_CACHE_CAPACITY),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Memoizes [`get_context`] by `(line, position)`.
#[derive(Debug, Clone, Default)]
pub struct DetectorCache {
    entries: LruCache<(String, usize), ExpressionContext>,
}

impl DetectorCache {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            entries: LruCache::new(capacity)?,
        })
    }

    pub fn get_context(&mut self, line: &str, position: usize) -> ExpressionContext {
        let key = (line.to_string(), position);
        if let Some(&context) = self.entries.get(&key) {
            trace!("detector cache hit at {position}");
            return context;
        }
        trace!("detector cache miss at {position}");
        let context = get_context(line, position);
        self.entries.insert(key, context);
        context
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Memoizes [`parse_template`] by template text.
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    entries: LruCache<String, Vec<TemplateProperty>>,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            entries: LruCache::new(capacity)?,
        })
    }

    /// Properties of `template`, parsed on first request.
    pub fn properties(&mut self, template: &str) -> &[TemplateProperty] {
        trace!("template cache lookup ({} bytes)", template.len());
        self.entries.get_or_insert_with(template, || {
            trace!("template cache miss, parsing");
            parse_template(template).collect()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = LruCache::<u32, u32>::new(0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity);
        assert!(DetectorCache::new(0).is_err());
        assert!(TemplateCache::new(0).is_err());
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);
        assert!(cache.contains_key(&"a"));
        assert!(!cache.contains_key(&"b"));
        assert!(cache.contains_key(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn peek_does_not_refresh() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert(1, "one");
        cache.insert(2, "two");
        assert_eq!(cache.peek(&1), Some(&"one"));
        cache.insert(3, "three");
        assert!(!cache.contains_key(&1));
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut cache = LruCache::new(4).unwrap();
        assert_eq!(cache.insert("k", 1), None);
        assert_eq!(cache.insert("k", 2), Some(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), 4);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn detector_cache_matches_direct_call() {
        let mut cache = DetectorCache::default();
        let line = r#"Filter.ByExcluding("@l = 'Debug'")"#;
        let first = cache.get_context(line, 22);
        let second = cache.get_context(line, 22);
        assert_eq!(first, ExpressionContext::FilterExpression);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn template_cache_parses_once() {
        let mut cache = TemplateCache::new(8).unwrap();
        let names: Vec<_> = cache
            .properties("User {UserId} from {Ip}")
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, ["UserId", "Ip"]);
        assert_eq!(cache.properties("User {UserId} from {Ip}").len(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.properties("no holes").is_empty());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_or_insert_with_builds_only_on_miss() {
        let mut cache: LruCache<String, usize> = LruCache::new(2).unwrap();
        let mut built = 0;
        for _ in 0..3 {
            let value = *cache.get_or_insert_with("a", || {
                built += 1;
                1
            });
            assert_eq!(value, 1);
        }
        assert_eq!(built, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_or_insert_with_refreshes_and_evicts() {
        let mut cache: LruCache<String, u32> = LruCache::new(2).unwrap();
        cache.get_or_insert_with("a", || 1);
        cache.get_or_insert_with("b", || 2);
        assert_eq!(*cache.get_or_insert_with("a", || 10), 1);
        assert_eq!(*cache.get_or_insert_with("c", || 3), 3);
        assert!(cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert_eq!(cache.peek("c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn template_cache_hit_keeps_one_entry_and_refreshes_it() {
        let mut cache = TemplateCache::new(2).unwrap();
        cache.properties("{A}");
        cache.properties("{B}");
        assert_eq!(cache.properties("{A}")[0].name, "A");
        cache.properties("{C}");
        assert_eq!(cache.len(), 2);
        assert!(cache.entries.contains_key("{A}"));
        assert!(!cache.entries.contains_key("{B}"));
    }
}
