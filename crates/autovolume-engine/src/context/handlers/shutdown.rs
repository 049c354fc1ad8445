use tracing::info;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::ShutdownMessage;

#[async_trait::async_trait]
impl Handler<ShutdownMessage> for ContextActor {
    async fn handle(&mut self, _message: ShutdownMessage, ctx: &mut ActorContext<Self>) -> () {
        self.teardown();
        info!("content context shut down");
        ctx.stop();
    }
}
