use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use autovolume_core::{AdjustmentKind, ContextRequest, ContextResponse, Settings, VolumeReport};
use autovolume_runtime::tokio_actor::{ActorRef, Handler, Message};

use crate::error::EngineError;
use crate::event_hub::EventHub;
use crate::source::graph::AudioGraphFactory;
use crate::types::Event;

use crate::context::actor::ContextActor;
use crate::context::messages::{
    ContextRequestMessage, GetTrackedCountMessage, ReconcileNowMessage, ShutdownMessage,
};

/// Cloneable handle to a running content context.
#[derive(Clone)]
pub struct ContextHandle {
    actor_ref: ActorRef<ContextActor>,
    events: Arc<EventHub>,
    graphs: AudioGraphFactory,
    timeout: Duration,
}

impl ContextHandle {
    pub(crate) fn new(
        actor_ref: ActorRef<ContextActor>,
        events: Arc<EventHub>,
        graphs: AudioGraphFactory,
        timeout: Duration,
    ) -> Self {
        Self {
            actor_ref,
            events,
            graphs,
            timeout,
        }
    }

    async fn call<M>(&self, operation: &'static str, message: M) -> Result<M::Response, EngineError>
    where
        M: Message,
        ContextActor: Handler<M>,
    {
        self.actor_ref
            .call(message, self.timeout)
            .await
            .map_err(|e| EngineError::from_call_error(operation, self.timeout, e))
    }

    /// Answers one remote-command-channel request.
    pub async fn request(&self, request: ContextRequest) -> Result<ContextResponse, EngineError> {
        let operation = request.kind();
        self.call(operation, ContextRequestMessage { request }).await
    }

    pub async fn current_volume(&self) -> Result<VolumeReport, EngineError> {
        self.request(ContextRequest::GetCurrentVolume)
            .await?
            .into_volume()
            .ok_or(EngineError::UnexpectedReply {
                operation: "GET_CURRENT_VOLUME",
            })
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<(), EngineError> {
        self.request(ContextRequest::SettingsUpdated { settings })
            .await
            .map(|_| ())
    }

    /// Returns whether the context accepted the command.
    pub async fn adjust_volume(
        &self,
        target_volume: i64,
        adjustment_type: AdjustmentKind,
    ) -> Result<bool, EngineError> {
        let response = self
            .request(ContextRequest::AdjustVolume {
                target_volume,
                adjustment_type,
            })
            .await?;
        match response {
            ContextResponse::Ack { success } => Ok(success),
            ContextResponse::Volume(_) => Err(EngineError::UnexpectedReply {
                operation: "ADJUST_VOLUME",
            }),
        }
    }

    /// Runs discovery and a full pass now. Returns the number of adjustments.
    pub async fn reconcile_now(&self) -> Result<usize, EngineError> {
        self.call("reconcile", ReconcileNowMessage).await
    }

    pub async fn tracked_sources(&self) -> Result<usize, EngineError> {
        self.call("tracked_sources", GetTrackedCountMessage).await
    }

    /// Factory page code builds its audio graphs with.
    pub fn audio_graphs(&self) -> AudioGraphFactory {
        self.graphs.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.call("shutdown", ShutdownMessage).await
    }

    pub fn is_closed(&self) -> bool {
        self.actor_ref.is_closed()
    }
}
