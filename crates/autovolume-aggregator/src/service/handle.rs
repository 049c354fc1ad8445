use std::time::Duration;

use serde_json::Value;

use autovolume_core::{
    AggregatorRequest, AggregatorResponse, Settings, TabId, TabSnapshot, TabStatus,
};
use autovolume_runtime::tokio_actor::{ActorRef, Handler, Message};

use crate::dispatch::parse_request;
use crate::error::AggregatorError;

use crate::service::actor::AggregatorActor;
use crate::service::messages::{
    PollNowMessage, RequestMessage, ShutdownMessage, TabRemovedMessage, TabUpdatedMessage,
};
use crate::service::poll::PollSummary;

#[derive(Clone)]
pub struct AggregatorHandle {
    actor_ref: ActorRef<AggregatorActor>,
    timeout: Duration,
}

impl AggregatorHandle {
    pub(crate) fn new(actor_ref: ActorRef<AggregatorActor>, timeout: Duration) -> Self {
        Self { actor_ref, timeout }
    }

    async fn call<M>(&self, operation: &'static str, message: M) -> Result<M::Response, AggregatorError>
    where
        M: Message,
        AggregatorActor: Handler<M>,
    {
        self.actor_ref
            .call(message, self.timeout)
            .await
            .map_err(|e| AggregatorError::from_call_error(operation, self.timeout, e))
    }

    pub async fn request(
        &self,
        request: AggregatorRequest,
    ) -> Result<AggregatorResponse, AggregatorError> {
        self.call("request", RequestMessage { request }).await
    }

    /// Answers a raw popup message. Unknown message types get a failure reply,
    /// not an error.
    pub async fn dispatch_json(&self, message: Value) -> Result<Value, AggregatorError> {
        let response = match parse_request(message) {
            Ok(request) => self.request(request).await?,
            Err(failure) => failure,
        };
        Ok(serde_json::to_value(response)?)
    }

    pub async fn settings(&self) -> Result<Settings, AggregatorError> {
        match self.request(AggregatorRequest::GetSettings).await? {
            AggregatorResponse::Settings(settings) => Ok(settings),
            _ => Err(AggregatorError::UnexpectedReply {
                operation: "GET_SETTINGS",
            }),
        }
    }

    pub async fn tab_volumes(&self) -> Result<Vec<TabSnapshot>, AggregatorError> {
        match self.request(AggregatorRequest::GetAllTabVolumes).await? {
            AggregatorResponse::TabVolumes(tabs) => Ok(tabs),
            _ => Err(AggregatorError::UnexpectedReply {
                operation: "GET_ALL_TAB_VOLUMES",
            }),
        }
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), AggregatorError> {
        let request = if enabled {
            AggregatorRequest::EnableExtension
        } else {
            AggregatorRequest::DisableExtension
        };
        self.request(request).await.map(|_| ())
    }

    /// Runs one poll cycle now and reports what it saw.
    pub async fn poll_now(&self) -> Result<PollSummary, AggregatorError> {
        self.call("poll", PollNowMessage).await
    }

    /// Host notification that a tab was closed.
    pub fn tab_removed(&self, tab: TabId) -> Result<(), AggregatorError> {
        self.actor_ref
            .cast(TabRemovedMessage { tab })
            .map_err(|_| AggregatorError::Exited {
                operation: "tab_removed",
            })
    }

    /// Host notification of a tab load state change.
    pub fn tab_updated(&self, tab: TabId, status: TabStatus) -> Result<(), AggregatorError> {
        self.actor_ref
            .cast(TabUpdatedMessage { tab, status })
            .map_err(|_| AggregatorError::Exited {
                operation: "tab_updated",
            })
    }

    pub async fn shutdown(&self) -> Result<(), AggregatorError> {
        self.call("shutdown", ShutdownMessage).await
    }

    pub fn is_closed(&self) -> bool {
        self.actor_ref.is_closed()
    }
}
