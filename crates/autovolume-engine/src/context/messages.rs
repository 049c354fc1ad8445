use std::sync::Arc;

use autovolume_core::{ContextRequest, ContextResponse};
use autovolume_runtime::tokio_actor::Message;

use crate::source::graph::GainNode;
use crate::types::SourceKey;

/// Initial discovery; arms polling when enabled.
pub(crate) struct StartMessage;

impl Message for StartMessage {
    type Response = ();
}

pub(crate) struct PollTickMessage;

impl Message for PollTickMessage {
    type Response = ();
}

pub(crate) struct MutationObservedMessage;

impl Message for MutationObservedMessage {
    type Response = ();
}

pub(crate) struct RescanMessage;

impl Message for RescanMessage {
    type Response = ();
}

pub(crate) struct SourceChangedMessage {
    pub(crate) key: SourceKey,
}

impl Message for SourceChangedMessage {
    type Response = ();
}

pub(crate) struct ReevaluateSourceMessage {
    pub(crate) key: SourceKey,
}

impl Message for ReevaluateSourceMessage {
    type Response = ();
}

pub(crate) struct GainNodeCreatedMessage {
    pub(crate) node: Arc<GainNode>,
}

impl Message for GainNodeCreatedMessage {
    type Response = ();
}

pub(crate) struct ContextRequestMessage {
    pub(crate) request: ContextRequest,
}

impl Message for ContextRequestMessage {
    type Response = ContextResponse;
}

/// Discovery plus a full pass, answered with the number of adjustments.
pub(crate) struct ReconcileNowMessage;

impl Message for ReconcileNowMessage {
    type Response = usize;
}

pub(crate) struct GetTrackedCountMessage;

impl Message for GetTrackedCountMessage {
    type Response = usize;
}

pub(crate) struct ShutdownMessage;

impl Message for ShutdownMessage {
    type Response = ();
}
