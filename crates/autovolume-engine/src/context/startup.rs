use std::sync::Arc;

use autovolume_core::Settings;
use autovolume_runtime::tokio_actor::{WeakActorRef, spawn_actor};

use crate::config::EngineConfig;
use crate::content::ContentTree;
use crate::error::EngineError;
use crate::event_hub::EventHub;
use crate::indicator::IndicatorSink;
use crate::source::graph::{AudioGraphFactory, GainNode, GraphObserver};

use crate::context::actor::ContextActor;
use crate::context::handle::ContextHandle;
use crate::context::messages::{GainNodeCreatedMessage, StartMessage};

/// Forwards every gain node created through the context's factory.
struct ContextGraphObserver {
    actor_ref: WeakActorRef<ContextActor>,
}

impl GraphObserver for ContextGraphObserver {
    fn gain_node_created(&self, node: Arc<GainNode>) {
        let _ = self.actor_ref.cast(GainNodeCreatedMessage { node });
    }
}

/// Starts the engine for one content context.
///
/// Resolves once the initial discovery pass has run. Gain nodes must be
/// created through [`ContextHandle::audio_graphs`] to be tracked.
pub async fn start_context(
    tree: Arc<dyn ContentTree>,
    indicator: Arc<dyn IndicatorSink>,
    settings: Settings,
    config: EngineConfig,
) -> Result<ContextHandle, EngineError> {
    let events = Arc::new(EventHub::new(config.event_capacity));
    let actor = ContextActor::new(Arc::clone(&events), config.clone(), settings, tree, indicator);
    let (actor_ref, _join) = spawn_actor(actor);

    let graphs = AudioGraphFactory::new(Arc::new(ContextGraphObserver {
        actor_ref: actor_ref.downgrade(),
    }));

    actor_ref
        .call(StartMessage, config.command_timeout)
        .await
        .map_err(|e| EngineError::from_call_error("start", config.command_timeout, e))?;

    Ok(ContextHandle::new(
        actor_ref,
        events,
        graphs,
        config.command_timeout,
    ))
}
