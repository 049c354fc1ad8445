#[cfg(test)]
mod integration_tests;
mod load_grace_elapsed;
mod poll_now;
mod poll_tick;
mod request;
mod shutdown;
mod start;
mod tab_removed;
mod tab_updated;
