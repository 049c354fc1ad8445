use autovolume_core::TabStatus;
use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::TabUpdatedMessage;

#[async_trait::async_trait]
impl Handler<TabUpdatedMessage> for AggregatorActor {
    async fn handle(&mut self, message: TabUpdatedMessage, ctx: &mut ActorContext<Self>) -> () {
        if message.status != TabStatus::Complete {
            return;
        }
        tracing::trace!(tab = %message.tab, "tab finished loading");
        self.schedule_load_poll(&ctx.actor_ref());
    }
}
