mod actor;
mod evaluate;
mod handle;
mod handlers;
mod messages;
mod scheduler;
mod startup;
mod watcher;

pub use handle::ContextHandle;
pub use startup::start_context;
