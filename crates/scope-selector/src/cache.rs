//! Cache of compiled selectors keyed by their source text.
//!
//! Theme and grammar definitions repeat the same selector strings many
//! times; the cache compiles each distinct string once and hands out shared
//! [`Selector`] handles afterwards.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

use crate::errors::ParseError;
use crate::selector::Selector;

/// Thread-safe map from selector text to compiled selector.
///
/// Entries are inserted only if absent: the first successful compilation of a
/// string is the one every later caller receives. Failed parses are not
/// cached.
///
/// # Examples
/// ```
/// use scope_selector::SelectorCache;
/// let cache = SelectorCache::new();
/// let first = cache.get_or_parse("source.js string").unwrap_or_else(|e| panic!("{e}"));
/// let second = cache.get_or_parse("source.js string").unwrap_or_else(|e| panic!("{e}"));
/// assert!(std::ptr::eq(first.root(), second.root()));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SelectorCache {
    entries: Mutex<HashMap<String, Selector>>,
}

impl SelectorCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Selector>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the compiled selector for `text`, compiling it on first use.
    ///
    /// # Errors
    /// Returns [`ParseError`] when `text` is not a valid selector.
    pub fn get_or_parse(&self, text: &str) -> Result<Selector, ParseError> {
        if let Some(selector) = self.entries().get(text) {
            return Ok(selector.clone());
        }
        log::trace!("selector cache miss for `{text}`");
        // Compile without holding the lock; a concurrent caller may win the
        // insert, in which case its selector is kept.
        let selector = Selector::parse(text)?;
        Ok(self
            .entries()
            .entry(text.to_owned())
            .or_insert(selector)
            .clone())
    }

    /// Return the cached selector for `text` without compiling.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Selector> {
        self.entries().get(text).cloned()
    }

    /// Number of cached selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache holds no selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop every cached selector. Handles already given out stay valid.
    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests require descriptive failures")]
mod tests {
    use super::*;
    use crate::scope::ScopePath;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn does_not_cache_failures() {
        let cache = SelectorCache::new();
        assert!(cache.get_or_parse("a,").is_err());
        assert!(cache.is_empty());
        assert!(cache.get("a,").is_none());
    }

    #[test]
    fn distinct_texts_get_distinct_entries() {
        let cache = SelectorCache::new();
        cache.get_or_parse("a b").expect("selector should parse");
        cache.get_or_parse("a  b").expect("selector should parse");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_keeps_outstanding_handles_usable() {
        let cache = SelectorCache::new();
        let selector = cache.get_or_parse("comment").expect("selector should parse");
        cache.clear();
        assert!(cache.is_empty());
        assert!(selector.matches(&ScopePath::from(["comment.line"])).matched);
    }

    #[test]
    fn concurrent_callers_share_one_entry() {
        let cache = Arc::new(SelectorCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_parse("source.js -comment"))
            })
            .collect();
        let selectors: Vec<Selector> = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("thread should not panic")
                    .expect("selector should parse")
            })
            .collect();
        assert_eq!(cache.len(), 1);
        let cached = cache.get("source.js -comment").expect("entry should exist");
        assert!(selectors.iter().all(|selector| selector == &cached));
    }
}
