//! Cancelable timers that deliver messages to actors.
//!
//! A [`TimerHandle`] owns the task driving the timer. Dropping the handle (or
//! calling [`TimerHandle::cancel`]) aborts it, so an actor that stores its
//! handles in its own state clears every pending timer just by resetting that
//! state.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::tokio_actor::{ActorRef, Handler, Message};

#[derive(Debug)]
pub struct TimerHandle {
    join: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(self) {
        self.join.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Casts `message` to `actor_ref` once, after `delay`.
///
/// The timer holds a weak reference and never keeps the actor alive.
pub fn cast_after<A, M>(actor_ref: &ActorRef<A>, message: M, delay: Duration) -> TimerHandle
where
    A: Handler<M>,
    M: Message<Response = ()>,
{
    let actor_ref = actor_ref.downgrade();
    let join = crate::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = actor_ref.cast(message);
    });
    TimerHandle { join }
}

/// Runs `f` on the shared runtime once, after `delay`.
pub fn run_after<F>(delay: Duration, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let join = crate::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    });
    TimerHandle { join }
}

/// Casts a fresh message produced by `make` every `period`.
///
/// The first message is sent one full period after arming. Missed ticks are
/// skipped rather than bursted. The timer holds a weak reference and stops by
/// itself once the actor has no strong references left.
pub fn cast_every<A, M, F>(actor_ref: &ActorRef<A>, period: Duration, make: F) -> TimerHandle
where
    A: Handler<M>,
    M: Message<Response = ()>,
    F: Fn() -> M + Send + 'static,
{
    let actor_ref = actor_ref.downgrade();
    let period = period.max(Duration::from_millis(1));
    let join = crate::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if actor_ref.cast(make()).is_err() {
                break;
            }
        }
    });
    TimerHandle { join }
}
