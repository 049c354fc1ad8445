use tracing::info;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::ShutdownMessage;

#[async_trait::async_trait]
impl Handler<ShutdownMessage> for AggregatorActor {
    async fn handle(&mut self, _message: ShutdownMessage, ctx: &mut ActorContext<Self>) -> () {
        self.stop_polling();
        info!("aggregator shut down");
        ctx.stop();
    }
}
