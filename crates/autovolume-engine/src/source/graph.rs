//! Audio graphs whose gain nodes are visible to the context at creation.
//!
//! Page code gets an [`AudioGraphFactory`] from its context and builds graphs
//! through it. Every [`GainNode`] a graph creates is reported to the factory's
//! [`GraphObserver`] before `create_gain` returns, however deep in the page the
//! call happens.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::source::observed::ObservedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    Running,
    Suspended,
    Closed,
}

pub trait GraphObserver: Send + Sync {
    fn gain_node_created(&self, node: Arc<GainNode>);
}

#[derive(Clone)]
pub struct AudioGraphFactory {
    observer: Arc<dyn GraphObserver>,
}

impl AudioGraphFactory {
    pub fn new(observer: Arc<dyn GraphObserver>) -> Self {
        Self { observer }
    }

    pub fn create_graph(&self) -> Arc<AudioGraph> {
        Arc::new(AudioGraph {
            state: Mutex::new(GraphState::Running),
            observer: Arc::clone(&self.observer),
        })
    }
}

pub struct AudioGraph {
    state: Mutex<GraphState>,
    observer: Arc<dyn GraphObserver>,
}

impl AudioGraph {
    /// Creates a gain node at unity gain and reports it to the observer.
    pub fn create_gain(self: &Arc<Self>) -> Arc<GainNode> {
        let node = Arc::new(GainNode {
            graph: Arc::clone(self),
            gain: ObservedValue::new(1.0),
        });
        self.observer.gain_node_created(Arc::clone(&node));
        node
    }

    pub fn state(&self) -> GraphState {
        *self.state.lock()
    }

    pub fn suspend(&self) {
        let mut state = self.state.lock();
        if *state == GraphState::Running {
            *state = GraphState::Suspended;
        }
    }

    pub fn resume(&self) {
        let mut state = self.state.lock();
        if *state == GraphState::Suspended {
            *state = GraphState::Running;
        }
    }

    /// Closing is final: every node of this graph stops being live.
    pub fn close(&self) {
        *self.state.lock() = GraphState::Closed;
    }
}

pub struct GainNode {
    graph: Arc<AudioGraph>,
    gain: ObservedValue,
}

impl GainNode {
    pub fn gain(&self) -> &ObservedValue {
        &self.gain
    }

    pub fn graph_state(&self) -> GraphState {
        self.graph.state()
    }

    pub fn is_live(&self) -> bool {
        self.graph_state() != GraphState::Closed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{AudioGraphFactory, GainNode, GraphObserver, GraphState};

    #[derive(Default)]
    struct CollectingObserver {
        nodes: Mutex<Vec<Arc<GainNode>>>,
    }

    impl GraphObserver for CollectingObserver {
        fn gain_node_created(&self, node: Arc<GainNode>) {
            self.nodes.lock().push(node);
        }
    }

    #[test]
    fn every_gain_node_is_reported_at_creation() {
        let observer = Arc::new(CollectingObserver::default());
        let factory = AudioGraphFactory::new(observer.clone());
        let graph = factory.create_graph();
        let first = graph.create_gain();
        let second = factory.create_graph().create_gain();

        let nodes = observer.nodes.lock();
        assert_eq!(nodes.len(), 2);
        assert!(Arc::ptr_eq(&nodes[0], &first));
        assert!(Arc::ptr_eq(&nodes[1], &second));
        assert_eq!(first.gain().get(), 1.0);
    }

    #[test]
    fn closing_graph_ends_node_liveness() {
        let observer = Arc::new(CollectingObserver::default());
        let graph = AudioGraphFactory::new(observer).create_graph();
        let node = graph.create_gain();

        graph.suspend();
        assert_eq!(node.graph_state(), GraphState::Suspended);
        assert!(node.is_live());

        graph.close();
        graph.resume();
        assert_eq!(node.graph_state(), GraphState::Closed);
        assert!(!node.is_live());
    }
}
