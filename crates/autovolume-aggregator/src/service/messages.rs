use autovolume_core::{AggregatorRequest, AggregatorResponse, TabId, TabStatus};
use autovolume_runtime::tokio_actor::Message;

use crate::service::poll::PollSummary;

pub(crate) struct StartMessage;

impl Message for StartMessage {
    type Response = ();
}

pub(crate) struct PollTickMessage;

impl Message for PollTickMessage {
    type Response = ();
}

pub(crate) struct PollNowMessage;

impl Message for PollNowMessage {
    type Response = PollSummary;
}

pub(crate) struct RequestMessage {
    pub(crate) request: AggregatorRequest,
}

impl Message for RequestMessage {
    type Response = AggregatorResponse;
}

pub(crate) struct TabRemovedMessage {
    pub(crate) tab: TabId,
}

impl Message for TabRemovedMessage {
    type Response = ();
}

pub(crate) struct TabUpdatedMessage {
    pub(crate) tab: TabId,
    pub(crate) status: TabStatus,
}

impl Message for TabUpdatedMessage {
    type Response = ();
}

pub(crate) struct LoadGraceElapsedMessage;

impl Message for LoadGraceElapsedMessage {
    type Response = ();
}

pub(crate) struct ShutdownMessage;

impl Message for ShutdownMessage {
    type Response = ();
}
