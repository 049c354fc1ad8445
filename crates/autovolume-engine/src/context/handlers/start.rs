use tracing::info;

use autovolume_runtime::tokio_actor::{ActorContext, Handler};

use crate::context::actor::ContextActor;
use crate::context::messages::StartMessage;

#[async_trait::async_trait]
impl Handler<StartMessage> for ContextActor {
    async fn handle(&mut self, _message: StartMessage, ctx: &mut ActorContext<Self>) -> () {
        let actor_ref = ctx.actor_ref();
        self.observe_content_tree(&actor_ref);
        let discovered = self.scan_content_tree(&actor_ref);
        if self.settings.enabled {
            self.start_monitoring(&actor_ref);
        }
        info!(
            discovered,
            enabled = self.settings.enabled,
            "content context started"
        );
    }
}
