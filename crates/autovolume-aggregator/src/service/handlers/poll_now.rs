use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::PollNowMessage;
use crate::service::poll::PollSummary;

#[async_trait::async_trait]
impl Handler<PollNowMessage> for AggregatorActor {
    async fn handle(
        &mut self,
        _message: PollNowMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> PollSummary {
        self.poll_all().await
    }
}
