use std::sync::Arc;

use parking_lot::Mutex;

use autovolume_core::clamp_level;

use crate::error::SourceError;
use crate::source::graph::{GainNode, GraphState};
use crate::source::observed::SubscriptionId;
use crate::source::{MediaSource, SourceChangeCallback};
use crate::types::{SourceKey, SourceKind};

/// A gain node. Gain has no mute flag, so it is never treated as muted.
pub struct GainSource {
    node: Arc<GainNode>,
    key: SourceKey,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl GainSource {
    pub fn new(node: Arc<GainNode>) -> Self {
        let key = SourceKey::of(&node);
        Self {
            node,
            key,
            subscription: Mutex::new(None),
        }
    }
}

impl MediaSource for GainSource {
    fn key(&self) -> SourceKey {
        self.key
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Gain
    }

    fn level(&self) -> Result<f64, SourceError> {
        if !self.node.is_live() {
            return Err(SourceError::Closed);
        }
        Ok(self.node.gain().get())
    }

    fn set_level(&self, level: f64) -> Result<(), SourceError> {
        if !self.node.is_live() {
            return Err(SourceError::Closed);
        }
        self.node.gain().set(clamp_level(level));
        Ok(())
    }

    fn is_muted(&self) -> bool {
        false
    }

    fn is_live(&self) -> bool {
        self.node.is_live()
    }

    fn is_playing(&self) -> bool {
        self.node.graph_state() == GraphState::Running
    }

    fn watch(&self, on_change: SourceChangeCallback) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }
        let id = self
            .node
            .gain()
            .subscribe(Arc::new(move |_value| on_change()));
        *subscription = Some(id);
    }

    fn unwatch(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.node.gain().unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::GainSource;
    use crate::error::SourceError;
    use crate::source::MediaSource;
    use crate::source::graph::{AudioGraphFactory, GainNode, GraphObserver};

    struct IgnoreNodes;

    impl GraphObserver for IgnoreNodes {
        fn gain_node_created(&self, _node: Arc<GainNode>) {}
    }

    #[test]
    fn writes_are_clamped_into_unit_range() {
        let graph = AudioGraphFactory::new(Arc::new(IgnoreNodes)).create_graph();
        let source = GainSource::new(graph.create_gain());

        source.set_level(1.6).expect("write loud gain");
        assert_eq!(source.level().expect("read gain"), 1.0);
        source.set_level(-0.3).expect("write negative gain");
        assert_eq!(source.level().expect("read gain"), 0.0);
        source.set_level(f64::NAN).expect("write NaN gain");
        assert_eq!(source.level().expect("read gain"), 0.0);

        graph.close();
        assert!(matches!(source.set_level(0.5), Err(SourceError::Closed)));
    }
}
