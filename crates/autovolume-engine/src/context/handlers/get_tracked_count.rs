use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::GetTrackedCountMessage;

#[async_trait::async_trait]
impl Handler<GetTrackedCountMessage> for ContextActor {
    async fn handle(
        &mut self,
        _message: GetTrackedCountMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> usize {
        self.registry.count()
    }
}
