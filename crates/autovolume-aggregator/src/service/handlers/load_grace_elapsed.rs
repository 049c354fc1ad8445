use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::LoadGraceElapsedMessage;

#[async_trait::async_trait]
impl Handler<LoadGraceElapsedMessage> for AggregatorActor {
    async fn handle(
        &mut self,
        _message: LoadGraceElapsedMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.grace_timer = None;
        self.poll_all().await;
    }
}
