use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::PollTickMessage;

#[async_trait::async_trait]
impl Handler<PollTickMessage> for ContextActor {
    async fn handle(&mut self, _message: PollTickMessage, ctx: &mut ActorContext<Self>) -> () {
        // A tick queued before polling was disarmed.
        if !self.scheduler.is_armed() {
            return;
        }
        self.reconcile(&ctx.actor_ref());
    }
}
