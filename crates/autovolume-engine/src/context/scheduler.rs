use std::time::Duration;

use autovolume_runtime::timer::{TimerHandle, cast_every};
use autovolume_runtime::tokio_actor::ActorRef;

use crate::context::actor::ContextActor;
use crate::context::messages::PollTickMessage;

/// The single repeating poll timer of a context.
pub(crate) struct PollingScheduler {
    interval: Duration,
    timer: Option<TimerHandle>,
}

impl PollingScheduler {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer: None,
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Returns false when polling was already running.
    pub(crate) fn arm(&mut self, actor_ref: &ActorRef<ContextActor>) -> bool {
        if self.timer.is_some() {
            return false;
        }
        self.timer = Some(cast_every(actor_ref, self.interval, || PollTickMessage));
        true
    }

    pub(crate) fn disarm(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.cancel();
                true
            },
            None => false,
        }
    }
}
