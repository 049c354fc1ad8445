use std::sync::Arc;

use tracing::{debug, info};

use autovolume_core::{
    AdjustmentDecision, AdjustmentKind, Settings, VolumeReport, level_to_percent,
    percent_to_level,
};
use autovolume_runtime::tokio_actor::ActorRef;

use crate::applier::AdjustmentApplier;
use crate::config::EngineConfig;
use crate::content::{ContentTree, ObserverId};
use crate::context::evaluate::{Applied, anchor_for, evaluate_source};
use crate::context::messages::{MutationObservedMessage, SourceChangedMessage};
use crate::context::scheduler::PollingScheduler;
use crate::context::watcher::DiscoveryWatcher;
use crate::event_hub::EventHub;
use crate::indicator::IndicatorSink;
use crate::registry::MediaRegistry;
use crate::source::{ElementSource, MediaSource};
use crate::types::{Event, SourceKey};

pub(crate) struct ContextActor {
    pub(crate) events: Arc<EventHub>,
    pub(crate) config: EngineConfig,
    pub(crate) settings: Settings,
    pub(crate) tree: Arc<dyn ContentTree>,
    pub(crate) mutation_observer: Option<ObserverId>,
    pub(crate) registry: MediaRegistry,
    pub(crate) applier: AdjustmentApplier,
    pub(crate) watcher: DiscoveryWatcher,
    pub(crate) scheduler: PollingScheduler,
}

impl ContextActor {
    pub(crate) fn new(
        events: Arc<EventHub>,
        config: EngineConfig,
        settings: Settings,
        tree: Arc<dyn ContentTree>,
        indicator: Arc<dyn IndicatorSink>,
    ) -> Self {
        Self {
            events,
            applier: AdjustmentApplier::new(indicator, config.system_hint_delay),
            watcher: DiscoveryWatcher::new(config.rescan_debounce, config.source_debounce),
            scheduler: PollingScheduler::new(config.poll_interval),
            registry: MediaRegistry::new(),
            config,
            settings,
            tree,
            mutation_observer: None,
        }
    }

    /// Subscribes to subtree mutations once. No-op when event triggers are off.
    pub(crate) fn observe_content_tree(&mut self, actor_ref: &ActorRef<Self>) {
        if !self.config.event_triggers || self.mutation_observer.is_some() {
            return;
        }
        let actor_ref = actor_ref.downgrade();
        let id = self.tree.observe_mutations(Arc::new(move || {
            let _ = actor_ref.cast(MutationObservedMessage);
        }));
        self.mutation_observer = Some(id);
    }

    /// Registers every attached element not tracked yet. Returns how many
    /// were added.
    pub(crate) fn scan_content_tree(&mut self, actor_ref: &ActorRef<Self>) -> usize {
        let mut added = 0;
        for element in self.tree.media_elements() {
            if self.registry.contains(SourceKey::of(&element)) {
                continue;
            }
            if self.track_source(Arc::new(ElementSource::new(element)), actor_ref) {
                added += 1;
            }
        }
        added
    }

    /// Registers `source`, installs its change listener and evaluates it once.
    pub(crate) fn track_source(
        &mut self,
        source: Arc<dyn MediaSource>,
        actor_ref: &ActorRef<Self>,
    ) -> bool {
        if !source.is_live() {
            return false;
        }
        let key = source.key();
        let kind = source.kind();
        if !self.registry.register(Arc::clone(&source)) {
            return false;
        }
        if self.config.event_triggers {
            let actor_ref = actor_ref.downgrade();
            source.watch(Arc::new(move || {
                let _ = actor_ref.cast(SourceChangedMessage { key });
            }));
        }
        debug!(%key, kind = kind.as_str(), "media source registered");
        self.events.emit(Event::SourceRegistered { key, kind });
        self.evaluate_one(key);
        true
    }

    pub(crate) fn evaluate_one(&mut self, key: SourceKey) {
        let Some(source) = self.registry.get(key) else {
            return;
        };
        if !source.is_live() {
            self.evict(key);
            return;
        }
        let anchor = anchor_for(source.as_ref(), self.registry.related_element());
        match evaluate_source(&self.settings, source.as_ref(), &mut self.applier, anchor) {
            Ok(Some(applied)) => self.report_applied(key, applied),
            Ok(None) => {},
            Err(err) => {
                debug!(%key, error = %err, "media source dropped during evaluation");
                self.evict(key);
            },
        }
    }

    /// One pass over every live source. Returns the number of adjustments.
    pub(crate) fn evaluate_all(&mut self) -> usize {
        let related = self.registry.related_element();
        let settings = self.settings;
        let applier = &mut self.applier;
        let mut applied = Vec::new();
        let evicted = self.registry.for_each_live(|source| {
            let anchor = anchor_for(source.as_ref(), related);
            if let Some(outcome) = evaluate_source(&settings, source.as_ref(), applier, anchor)? {
                applied.push((source.key(), outcome));
            }
            Ok(())
        });
        for key in evicted {
            self.forget_evicted(key);
        }
        let count = applied.len();
        for (key, outcome) in applied {
            self.report_applied(key, outcome);
        }
        count
    }

    /// Discovery followed by a full pass.
    pub(crate) fn reconcile(&mut self, actor_ref: &ActorRef<Self>) -> usize {
        self.scan_content_tree(actor_ref);
        self.evaluate_all()
    }

    /// Swaps in a new settings snapshot and starts or stops monitoring to match.
    pub(crate) fn replace_settings(&mut self, settings: Settings, actor_ref: &ActorRef<Self>) {
        self.settings = settings;
        self.events.emit(Event::SettingsReplaced { settings });
        if settings.enabled {
            self.start_monitoring(actor_ref);
            self.reconcile(actor_ref);
        } else {
            self.stop_monitoring();
        }
    }

    pub(crate) fn start_monitoring(&mut self, actor_ref: &ActorRef<Self>) {
        if self.scheduler.arm(actor_ref) {
            info!(
                min = self.settings.min_volume,
                max = self.settings.max_volume,
                "volume monitoring started"
            );
            self.events.emit(Event::MonitoringChanged { active: true });
        }
    }

    pub(crate) fn stop_monitoring(&mut self) {
        self.watcher.cancel_reevaluations();
        self.applier.cancel_pending();
        if self.scheduler.disarm() {
            info!("volume monitoring stopped");
            self.events.emit(Event::MonitoringChanged { active: false });
        }
    }

    /// Moves live unmuted sources toward `target_percent`: a boost raises the
    /// ones below it, a reduce lowers the ones above it.
    pub(crate) fn apply_remote_adjustment(
        &mut self,
        target_percent: i64,
        kind: AdjustmentKind,
    ) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let target = percent_to_level(target_percent);
        let decision = match kind {
            AdjustmentKind::Boost => AdjustmentDecision::boost(target),
            AdjustmentKind::Reduce => AdjustmentDecision::reduce(target),
            AdjustmentKind::None => return true,
        };
        let related = self.registry.related_element();
        let applier = &mut self.applier;
        let mut applied = Vec::new();
        let evicted = self.registry.for_each_live(|source| {
            if source.is_muted() {
                return Ok(());
            }
            let level = source.level()?;
            let percent = level_to_percent(level);
            let moves = match kind {
                AdjustmentKind::Boost => percent < target_percent,
                AdjustmentKind::Reduce => percent > target_percent,
                AdjustmentKind::None => false,
            };
            if !moves {
                return Ok(());
            }
            let anchor = anchor_for(source.as_ref(), related);
            if applier.apply(source.as_ref(), &decision, anchor)? {
                applied.push((
                    source.key(),
                    Applied {
                        from_percent: percent,
                        decision,
                    },
                ));
            }
            Ok(())
        });
        for key in evicted {
            self.forget_evicted(key);
        }
        for (key, outcome) in applied {
            self.report_applied(key, outcome);
        }
        true
    }

    pub(crate) fn volume_report(&self) -> VolumeReport {
        self.registry.volume_report(self.config.max_volume_threshold)
    }

    /// Cancels every timer and detaches every listener and observer.
    pub(crate) fn teardown(&mut self) {
        self.stop_monitoring();
        self.watcher.cancel_all();
        self.registry.clear();
        if let Some(id) = self.mutation_observer.take() {
            self.tree.unobserve_mutations(id);
        }
    }

    fn evict(&mut self, key: SourceKey) {
        if self.registry.evict(key) {
            self.forget_evicted(key);
        }
    }

    fn forget_evicted(&mut self, key: SourceKey) {
        self.watcher.forget(key);
        debug!(%key, "media source evicted");
        self.events.emit(Event::SourceEvicted { key });
    }

    fn report_applied(&self, key: SourceKey, applied: Applied) {
        let to_percent = applied.decision.target_percent();
        debug!(
            %key,
            kind = applied.decision.kind.as_str(),
            from = applied.from_percent,
            to = to_percent,
            "volume adjusted"
        );
        self.events.emit(Event::Adjusted {
            key,
            kind: applied.decision.kind,
            from_percent: applied.from_percent,
            to_percent,
        });
    }
}

impl Drop for ContextActor {
    fn drop(&mut self) {
        self.teardown();
    }
}
