//! Per-context volume normalization engine.
//!
//! A content context owns a [`registry::MediaRegistry`] of element and gain
//! sources. Discovery, event-triggered re-evaluation and the polling pass all
//! run inside one actor, so every source is evaluated by exactly one pass at a
//! time. Hosts plug in through [`content::ContentTree`],
//! [`content::MediaElement`] and [`indicator::IndicatorSink`]; gain nodes are
//! created through the [`source::graph::AudioGraphFactory`] a context hands
//! out.

#![deny(clippy::wildcard_imports)]

pub mod applier;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
mod event_hub;
pub mod headless;
pub mod indicator;
pub mod registry;
pub mod source;
pub mod types;

pub use config::EngineConfig;
pub use context::{ContextHandle, start_context};
pub use error::{EngineError, SourceError};
pub use types::{Event, IndicatorAnchor, IndicatorEvent, SourceKey, SourceKind};
