use std::sync::Arc;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::GainNodeCreatedMessage;
use crate::source::GainSource;

#[async_trait::async_trait]
impl Handler<GainNodeCreatedMessage> for ContextActor {
    async fn handle(
        &mut self,
        message: GainNodeCreatedMessage,
        ctx: &mut ActorContext<Self>,
    ) -> () {
        self.track_source(Arc::new(GainSource::new(message.node)), &ctx.actor_ref());
    }
}
