use tracing::trace;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::RescanMessage;

#[async_trait::async_trait]
impl Handler<RescanMessage> for ContextActor {
    async fn handle(&mut self, _message: RescanMessage, ctx: &mut ActorContext<Self>) -> () {
        self.watcher.rescan_started();
        let added = self.scan_content_tree(&ctx.actor_ref());
        trace!(added, "content tree re-scanned");
    }
}
