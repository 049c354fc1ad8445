//! Cross-tab coordination: settings, per-tab volume polling and the tab
//! directory the popup displays.
//!
//! The aggregator reaches content contexts only through a [`host::TabHost`].
//! [`host::InProcessTabHost`] wires it straight to engine
//! [`autovolume_engine::ContextHandle`]s running in the same process.

pub mod config;
pub mod directory;
mod dispatch;
pub mod error;
pub mod host;
mod service;
pub mod store;

pub use config::AggregatorConfig;
pub use error::{AggregatorError, StoreError};
pub use host::{InProcessTabHost, TabHost};
pub use service::{AggregatorHandle, PollSummary, start_aggregator};
pub use store::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
