//! Media sources the registry tracks.
//!
//! [`ElementSource`] wraps a host element and [`GainSource`] wraps a gain node
//! created through [`graph::AudioGraphFactory`]. Both clamp every write into
//! `[0, 1]`.

use std::sync::Arc;

use crate::error::SourceError;
use crate::types::{SourceKey, SourceKind};

mod element;
mod gain;
pub mod graph;
pub mod observed;

pub use element::ElementSource;
pub use gain::GainSource;

pub type SourceChangeCallback = Arc<dyn Fn() + Send + Sync>;

pub trait MediaSource: Send + Sync {
    fn key(&self) -> SourceKey;
    fn kind(&self) -> SourceKind;
    fn level(&self) -> Result<f64, SourceError>;
    fn set_level(&self, level: f64) -> Result<(), SourceError>;
    fn is_muted(&self) -> bool;
    /// Still attached to its origin (element in the tree, graph not closed).
    fn is_live(&self) -> bool;
    fn is_playing(&self) -> bool;
    /// Installs `on_change` on the source's lifecycle notifications.
    /// A second call while watching is a no-op.
    fn watch(&self, on_change: SourceChangeCallback);
    fn unwatch(&self);
}

