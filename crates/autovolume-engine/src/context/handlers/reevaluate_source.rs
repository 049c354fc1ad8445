use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::ReevaluateSourceMessage;

#[async_trait::async_trait]
impl Handler<ReevaluateSourceMessage> for ContextActor {
    async fn handle(
        &mut self,
        message: ReevaluateSourceMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.watcher.reevaluation_started(message.key);
        self.evaluate_one(message.key);
    }
}
