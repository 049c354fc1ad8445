//! Debounce bookkeeping for discovery and per-source re-evaluation.
//!
//! At most one re-scan and at most one re-evaluation per source are pending at
//! any time. Later triggers that arrive while one is pending are absorbed by it.

use std::collections::HashMap;
use std::time::Duration;

use autovolume_runtime::timer::{TimerHandle, cast_after};
use autovolume_runtime::tokio_actor::ActorRef;

use crate::context::actor::ContextActor;
use crate::context::messages::{ReevaluateSourceMessage, RescanMessage};
use crate::types::SourceKey;

pub(crate) struct DiscoveryWatcher {
    rescan_debounce: Duration,
    source_debounce: Duration,
    rescan: Option<TimerHandle>,
    pending: HashMap<SourceKey, TimerHandle>,
}

impl DiscoveryWatcher {
    pub(crate) fn new(rescan_debounce: Duration, source_debounce: Duration) -> Self {
        Self {
            rescan_debounce,
            source_debounce,
            rescan: None,
            pending: HashMap::new(),
        }
    }

    pub(crate) fn schedule_rescan(&mut self, actor_ref: &ActorRef<ContextActor>) -> bool {
        if self.rescan.is_some() {
            return false;
        }
        self.rescan = Some(cast_after(actor_ref, RescanMessage, self.rescan_debounce));
        true
    }

    pub(crate) fn rescan_started(&mut self) {
        self.rescan = None;
    }

    pub(crate) fn schedule_reevaluation(
        &mut self,
        key: SourceKey,
        actor_ref: &ActorRef<ContextActor>,
    ) -> bool {
        if self.pending.contains_key(&key) {
            return false;
        }
        let timer = cast_after(
            actor_ref,
            ReevaluateSourceMessage { key },
            self.source_debounce,
        );
        self.pending.insert(key, timer);
        true
    }

    pub(crate) fn reevaluation_started(&mut self, key: SourceKey) {
        self.pending.remove(&key);
    }

    /// Drops the pending re-evaluation of an evicted source.
    pub(crate) fn forget(&mut self, key: SourceKey) {
        self.pending.remove(&key);
    }

    pub(crate) fn cancel_reevaluations(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn cancel_all(&mut self) {
        self.rescan = None;
        self.pending.clear();
    }
}
