use tracing::info;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::StartMessage;

#[async_trait::async_trait]
impl Handler<StartMessage> for AggregatorActor {
    async fn handle(&mut self, _message: StartMessage, ctx: &mut ActorContext<Self>) -> () {
        info!(
            enabled = self.settings.enabled,
            min = self.settings.min_volume,
            max = self.settings.max_volume,
            "aggregator started"
        );
        if self.settings.enabled {
            self.start_polling(&ctx.actor_ref());
        }
    }
}
