mod actor;
mod handle;
mod handlers;
mod messages;
mod poll;
mod startup;

pub use handle::AggregatorHandle;
pub use poll::PollSummary;
pub use startup::start_aggregator;
