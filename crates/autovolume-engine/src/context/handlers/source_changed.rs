use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::SourceChangedMessage;

#[async_trait::async_trait]
impl Handler<SourceChangedMessage> for ContextActor {
    async fn handle(&mut self, message: SourceChangedMessage, ctx: &mut ActorContext<Self>) -> () {
        if !self.settings.enabled || !self.registry.contains(message.key) {
            return;
        }
        self.watcher
            .schedule_reevaluation(message.key, &ctx.actor_ref());
    }
}
