use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::ReconcileNowMessage;

#[async_trait::async_trait]
impl Handler<ReconcileNowMessage> for ContextActor {
    async fn handle(&mut self, _message: ReconcileNowMessage, ctx: &mut ActorContext<Self>) -> usize {
        self.reconcile(&ctx.actor_ref())
    }
}
