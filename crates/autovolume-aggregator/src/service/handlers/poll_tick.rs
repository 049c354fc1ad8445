use tracing::trace;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::PollTickMessage;

#[async_trait::async_trait]
impl Handler<PollTickMessage> for AggregatorActor {
    async fn handle(&mut self, _message: PollTickMessage, _ctx: &mut ActorContext<Self>) -> () {
        let summary = self.poll_all().await;
        trace!(?summary, "poll cycle finished");
    }
}
