//! Mailbox actors on the shared runtime.
//!
//! An actor handles one message at a time, so state owned by the actor is
//! never touched concurrently. `cast` is fire-and-forget; `call` waits for the
//! response with a bounded timeout.

use std::any::type_name;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

pub trait Actor: Send + 'static {}

impl<T> Actor for T where T: Send + 'static {}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

/// Per-message view of the running actor.
///
/// A fresh context is built for every delivered message, so `actor_ref` is
/// always backed by the sender that enqueued it.
pub struct ActorContext<A: Actor> {
    self_ref: ActorRef<A>,
    stop_requested: bool,
}

impl<A: Actor> ActorContext<A> {
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub fn actor_ref(&self) -> ActorRef<A> {
        self.self_ref.clone()
    }
}

#[async_trait::async_trait]
pub trait Handler<M>: Actor
where
    M: Message,
    Self: Sized,
{
    async fn handle(&mut self, message: M, ctx: &mut ActorContext<Self>) -> M::Response;
}

/// Resolves to `true` when the handler asked the actor to stop.
type DeliveryFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

trait Envelope<A: Actor>: Send + 'static {
    fn deliver<'a>(self: Box<Self>, actor: &'a mut A) -> DeliveryFuture<'a>;
}

struct Mail<M, A>
where
    M: Message,
    A: Handler<M>,
{
    message: M,
    reply: Option<oneshot::Sender<M::Response>>,
    sender: ActorRef<A>,
}

impl<M, A> Envelope<A> for Mail<M, A>
where
    M: Message,
    A: Handler<M>,
{
    fn deliver<'a>(self: Box<Self>, actor: &'a mut A) -> DeliveryFuture<'a> {
        let Mail {
            message,
            reply,
            sender,
        } = *self;
        Box::pin(async move {
            let mut ctx = ActorContext {
                self_ref: sender,
                stop_requested: false,
            };
            let response = actor.handle(message, &mut ctx).await;
            if let Some(reply) = reply {
                let _ = reply.send(response);
            }
            ctx.stop_requested
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastError {
    MailboxClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    MailboxClosed,
    Timeout,
    ActorStopped,
}

pub struct ActorRef<A: Actor> {
    tx: mpsc::UnboundedSender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// A reference that does not keep the actor alive.
    ///
    /// The mailbox stops once every strong `ActorRef` is gone, so timers and
    /// callbacks installed on behalf of an actor should hold one of these.
    pub fn downgrade(&self) -> WeakActorRef<A> {
        WeakActorRef {
            tx: self.tx.downgrade(),
        }
    }

    pub fn cast<M>(&self, message: M) -> Result<(), CastError>
    where
        M: Message<Response = ()>,
        A: Handler<M>,
    {
        self.post(message, None).map_err(|_| CastError::MailboxClosed)
    }

    pub async fn call<M>(&self, message: M, timeout: Duration) -> Result<M::Response, CallError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.post(message, Some(reply_tx))
            .map_err(|_| CallError::MailboxClosed)?;
        match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(CallError::ActorStopped),
            Err(_) => Err(CallError::Timeout),
        }
    }

    fn post<M>(
        &self,
        message: M,
        reply: Option<oneshot::Sender<M::Response>>,
    ) -> Result<(), mpsc::error::SendError<Box<dyn Envelope<A>>>>
    where
        M: Message,
        A: Handler<M>,
    {
        self.tx.send(Box::new(Mail {
            message,
            reply,
            sender: self.clone(),
        }))
    }
}

pub struct WeakActorRef<A: Actor> {
    tx: mpsc::WeakUnboundedSender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for WeakActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A: Actor> WeakActorRef<A> {
    pub fn upgrade(&self) -> Option<ActorRef<A>> {
        self.tx.upgrade().map(|tx| ActorRef { tx })
    }

    /// Casts through a temporary strong reference. Fails once the actor has
    /// no strong references left.
    pub fn cast<M>(&self, message: M) -> Result<(), CastError>
    where
        M: Message<Response = ()>,
        A: Handler<M>,
    {
        self.upgrade()
            .ok_or(CastError::MailboxClosed)?
            .cast(message)
    }
}

pub fn spawn_actor<A: Actor>(actor: A) -> (ActorRef<A>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel::<Box<dyn Envelope<A>>>();
    let join = crate::spawn(run_mailbox(actor, rx));
    (ActorRef { tx }, join)
}

/// Drains the mailbox until every strong sender is gone, a handler stops the actor,
/// or a handler panics. Pending callers then observe `ActorStopped`.
async fn run_mailbox<A: Actor>(
    mut actor: A,
    mut rx: mpsc::UnboundedReceiver<Box<dyn Envelope<A>>>,
) {
    while let Some(envelope) = rx.recv().await {
        match AssertUnwindSafe(envelope.deliver(&mut actor))
            .catch_unwind()
            .await
        {
            Ok(false) => {}
            Ok(true) => break,
            Err(_) => {
                error!(actor = type_name::<A>(), "actor handler panicked; mailbox closed");
                break;
            }
        }
    }
    rx.close();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ActorContext, CallError, CastError, Handler, Message, spawn_actor};

    #[derive(Default)]
    struct LevelActor {
        percent: u32,
    }

    struct Nudge;
    impl Message for Nudge {
        type Response = ();
    }

    struct Level;
    impl Message for Level {
        type Response = u32;
    }

    struct NudgeSelf;
    impl Message for NudgeSelf {
        type Response = ();
    }

    struct Stop;
    impl Message for Stop {
        type Response = ();
    }

    #[async_trait::async_trait]
    impl Handler<Nudge> for LevelActor {
        async fn handle(&mut self, _message: Nudge, _ctx: &mut ActorContext<Self>) {
            self.percent = self.percent.saturating_add(5).min(100);
        }
    }

    #[async_trait::async_trait]
    impl Handler<Level> for LevelActor {
        async fn handle(&mut self, _message: Level, _ctx: &mut ActorContext<Self>) -> u32 {
            self.percent
        }
    }

    #[async_trait::async_trait]
    impl Handler<NudgeSelf> for LevelActor {
        async fn handle(&mut self, _message: NudgeSelf, ctx: &mut ActorContext<Self>) {
            ctx.actor_ref().cast(Nudge).expect("self cast");
        }
    }

    #[async_trait::async_trait]
    impl Handler<Stop> for LevelActor {
        async fn handle(&mut self, _message: Stop, ctx: &mut ActorContext<Self>) {
            ctx.stop();
        }
    }

    #[test]
    fn cast_then_call_observes_mailbox_order() {
        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(LevelActor::default());
            actor_ref.cast(Nudge).expect("cast nudge");
            actor_ref.cast(Nudge).expect("cast nudge");
            let value = actor_ref
                .call(Level, Duration::from_millis(200))
                .await
                .expect("call level");
            assert_eq!(value, 10);
            drop(actor_ref);
            join.await.expect("join actor task");
        });
    }

    #[test]
    fn call_times_out_on_slow_handler() {
        struct SlowActor;

        struct SlowCall;
        impl Message for SlowCall {
            type Response = u8;
        }

        #[async_trait::async_trait]
        impl Handler<SlowCall> for SlowActor {
            async fn handle(&mut self, _message: SlowCall, _ctx: &mut ActorContext<Self>) -> u8 {
                tokio::time::sleep(Duration::from_millis(80)).await;
                9
            }
        }

        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(SlowActor);
            let err = actor_ref
                .call(SlowCall, Duration::from_millis(10))
                .await
                .expect_err("expected timeout");
            assert_eq!(err, CallError::Timeout);
            drop(actor_ref);
            join.await.expect("join actor task");
        });
    }

    #[test]
    fn handler_can_cast_to_itself() {
        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(LevelActor::default());
            actor_ref
                .call(NudgeSelf, Duration::from_millis(200))
                .await
                .expect("nudge self");
            let value = actor_ref
                .call(Level, Duration::from_millis(200))
                .await
                .expect("call level");
            assert_eq!(value, 5);
            drop(actor_ref);
            join.await.expect("join actor task");
        });
    }

    #[test]
    fn stopped_actor_closes_mailbox() {
        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(LevelActor::default());
            actor_ref
                .call(Stop, Duration::from_millis(200))
                .await
                .expect("stop");
            join.await.expect("join actor task");
            assert!(actor_ref.is_closed());
            assert_eq!(actor_ref.cast(Nudge), Err(CastError::MailboxClosed));
        });
    }

    #[test]
    fn weak_ref_does_not_keep_actor_alive() {
        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(LevelActor::default());
            let weak = actor_ref.downgrade();
            weak.cast(Nudge).expect("cast through weak ref");
            let value = actor_ref
                .call(Level, Duration::from_millis(200))
                .await
                .expect("call level");
            assert_eq!(value, 5);

            drop(actor_ref);
            join.await.expect("join actor task");
            assert!(weak.upgrade().is_none());
            assert_eq!(weak.cast(Nudge), Err(CastError::MailboxClosed));
        });
    }

    #[test]
    fn handler_panic_is_isolated() {
        struct PanicCall;
        impl Message for PanicCall {
            type Response = u8;
        }

        #[async_trait::async_trait]
        impl Handler<PanicCall> for LevelActor {
            async fn handle(&mut self, _message: PanicCall, _ctx: &mut ActorContext<Self>) -> u8 {
                panic!("panic in actor handler");
            }
        }

        crate::block_on(async {
            let (actor_ref, join) = spawn_actor(LevelActor::default());
            let err = actor_ref
                .call(PanicCall, Duration::from_millis(200))
                .await
                .expect_err("panic call should fail");
            assert_eq!(err, CallError::ActorStopped);
            let next = actor_ref.call(Level, Duration::from_millis(200)).await;
            assert!(matches!(
                next,
                Err(CallError::MailboxClosed) | Err(CallError::ActorStopped)
            ));
            drop(actor_ref);
            join.await.expect("join actor task");
        });
    }
}
