use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::MutationObservedMessage;

#[async_trait::async_trait]
impl Handler<MutationObservedMessage> for ContextActor {
    async fn handle(
        &mut self,
        _message: MutationObservedMessage,
        ctx: &mut ActorContext<Self>,
    ) -> () {
        self.watcher.schedule_rescan(&ctx.actor_ref());
    }
}
