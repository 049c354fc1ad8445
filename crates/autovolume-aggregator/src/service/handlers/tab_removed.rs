use tracing::debug;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::service::actor::AggregatorActor;
use crate::service::messages::TabRemovedMessage;

#[async_trait::async_trait]
impl Handler<TabRemovedMessage> for AggregatorActor {
    async fn handle(&mut self, message: TabRemovedMessage, _ctx: &mut ActorContext<Self>) -> () {
        if self.directory.remove(message.tab) {
            debug!(tab = %message.tab, "closed tab removed from directory");
        }
    }
}
