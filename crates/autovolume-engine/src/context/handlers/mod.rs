mod context_request;
mod gain_node_created;
mod get_tracked_count;
mod mutation_observed;
mod poll_tick;
mod reconcile_now;
mod reevaluate_source;
mod rescan;
mod shutdown;
mod source_changed;
mod start;
