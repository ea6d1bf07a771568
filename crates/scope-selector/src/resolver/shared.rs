//! Copy-on-write holder for the current rule table.

use std::sync::{Arc, PoisonError, RwLock};

use super::RuleTable;

/// The current [`RuleTable`] behind an atomically swapped reference.
///
/// Readers take a [`snapshot`](Self::snapshot) and resolve against it for as
/// long as they like; [`replace`](Self::replace) installs a freshly built
/// table without touching snapshots already handed out. The lock is held
/// only to clone or swap the `Arc`, never during resolution.
///
/// # Examples
/// ```
/// use scope_selector::{RuleTable, ScopePath, SharedRuleTable};
///
/// let (dark, _) = RuleTable::from_sources([("comment", "grey")]);
/// let shared = SharedRuleTable::new(dark);
/// let before = shared.snapshot();
///
/// let (light, _) = RuleTable::from_sources([("comment", "green")]);
/// shared.replace(light);
///
/// let path = ScopePath::from(["source.js", "comment.line"]);
/// assert_eq!(before.resolve(&path).map(|hit| *hit.value), Some("grey"));
/// assert_eq!(shared.snapshot().resolve(&path).map(|hit| *hit.value), Some("green"));
/// ```
#[derive(Debug)]
pub struct SharedRuleTable<V> {
    current: RwLock<Arc<RuleTable<V>>>,
}

impl<V> SharedRuleTable<V> {
    /// Start with `table` as the current rules.
    #[must_use]
    pub fn new(table: RuleTable<V>) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// A consistent view of the current rules.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RuleTable<V>> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `table` as the current rules, returning the previous table.
    pub fn replace(&self, table: RuleTable<V>) -> Arc<RuleTable<V>> {
        let next = Arc::new(table);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        log::debug!(
            "replacing rule table: {} rules -> {} rules",
            current.len(),
            next.len()
        );
        std::mem::replace(&mut *current, next)
    }
}

impl<V> Default for SharedRuleTable<V> {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}

impl<V> From<RuleTable<V>> for SharedRuleTable<V> {
    fn from(table: RuleTable<V>) -> Self {
        Self::new(table)
    }
}
