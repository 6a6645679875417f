//! Active subscription table.
//!
//! Entries are created by subscription-management code (whoever issued
//! `eth_subscribe`); the provider's message dispatcher only consults them
//! to decide whether an inbound notification gets re-emitted under its
//! subscription identifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared map from subscription identifier to an active flag.
///
/// Cheap to clone; all clones view the same table.
#[derive(Clone, Default)]
pub struct SubscriptionTable {
    entries: Arc<Mutex<HashMap<String, bool>>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` active. Notifications tagged with it will be re-emitted
    /// under an event named exactly `id`.
    pub fn activate(&self, id: impl Into<String>) {
        self.entries.lock().unwrap().insert(id.into(), true);
    }

    /// Keep the entry but stop routing for it.
    pub fn deactivate(&self, id: &str) {
        if let Some(flag) = self.entries.lock().unwrap().get_mut(id) {
            *flag = false;
        }
    }

    /// Drop the entry entirely (e.g. after `eth_unsubscribe`).
    pub fn remove(&self, id: &str) {
        self.entries.lock().unwrap().remove(id);
    }

    /// Returns `true` if `id` is present and flagged active.
    pub fn is_active(&self, id: &str) -> bool {
        self.entries.lock().unwrap().get(id).copied().unwrap_or(false)
    }

    /// Number of entries, active or not.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_and_lookup() {
        let table = SubscriptionTable::new();
        assert!(!table.is_active("0x0"));
        table.activate("0x0");
        assert!(table.is_active("0x0"));
    }

    #[test]
    fn deactivated_entry_stays_but_stops_routing() {
        let table = SubscriptionTable::new();
        table.activate("0xa");
        table.deactivate("0xa");
        assert!(!table.is_active("0xa"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_drops_entry() {
        let table = SubscriptionTable::new();
        table.activate("0xa");
        table.remove("0xa");
        assert!(table.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let table = SubscriptionTable::new();
        let view = table.clone();
        table.activate("0xbeef");
        assert!(view.is_active("0xbeef"));
    }
}
