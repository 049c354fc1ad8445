use std::collections::{BTreeMap, HashSet};

use autovolume_core::{TabId, TabSnapshot};

/// Latest per-tab volume entries, keyed by tab.
#[derive(Debug, Default)]
pub struct TabDirectory {
    entries: BTreeMap<TabId, TabSnapshot>,
}

impl TabDirectory {
    pub fn upsert(&mut self, snapshot: TabSnapshot) {
        self.entries.insert(snapshot.tab_id, snapshot);
    }

    pub fn remove(&mut self, tab: TabId) -> bool {
        self.entries.remove(&tab).is_some()
    }

    /// Drops every entry whose tab is not in `present`. Returns how many went.
    pub fn retain_present(&mut self, present: &HashSet<TabId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| present.contains(id));
        before - self.entries.len()
    }

    pub fn get(&self, tab: TabId) -> Option<&TabSnapshot> {
        self.entries.get(&tab)
    }

    pub fn snapshots(&self) -> Vec<TabSnapshot> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
