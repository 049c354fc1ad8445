use tracing::debug;

use autovolume_core::{ContextRequest, ContextResponse};
use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::ContextRequestMessage;

#[async_trait::async_trait]
impl Handler<ContextRequestMessage> for ContextActor {
    async fn handle(
        &mut self,
        message: ContextRequestMessage,
        ctx: &mut ActorContext<Self>,
    ) -> ContextResponse {
        debug!(request = message.request.kind(), "context request");
        match message.request {
            ContextRequest::GetCurrentVolume => ContextResponse::Volume(self.volume_report()),
            ContextRequest::AdjustVolume {
                target_volume,
                adjustment_type,
            } => ContextResponse::Ack {
                success: self.apply_remote_adjustment(target_volume, adjustment_type),
            },
            ContextRequest::SettingsUpdated { settings } => {
                self.replace_settings(settings, &ctx.actor_ref());
                ContextResponse::ack()
            },
        }
    }
}
