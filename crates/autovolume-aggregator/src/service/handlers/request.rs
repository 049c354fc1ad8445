use autovolume_core::AggregatorResponse;
use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::RequestMessage;

#[async_trait::async_trait]
impl Handler<RequestMessage> for AggregatorActor {
    async fn handle(
        &mut self,
        message: RequestMessage,
        ctx: &mut ActorContext<Self>,
    ) -> AggregatorResponse {
        let actor_ref = ctx.actor_ref();
        self.handle_request(message.request, &actor_ref).await
    }
}
