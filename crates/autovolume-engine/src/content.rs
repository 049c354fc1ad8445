//! Interfaces a host page implements so a context can find its media.

use std::sync::Arc;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaTag {
    Audio,
    Video,
}

/// Element lifecycle notifications that warrant a re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    VolumeChange,
    Play,
    LoadedData,
    LoadedMetadata,
    RateChange,
}

pub type MediaEventListener = Arc<dyn Fn(MediaEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A playable element as seen through the host.
pub trait MediaElement: Send + Sync {
    fn tag(&self) -> MediaTag;
    /// Native volume in `[0, 1]`.
    fn volume(&self) -> Result<f64, SourceError>;
    fn set_volume(&self, volume: f64) -> Result<(), SourceError>;
    /// The user's mute choice. Never written by the engine.
    fn is_muted(&self) -> bool;
    fn is_paused(&self) -> bool;
    /// Still attached to its content tree.
    fn is_connected(&self) -> bool;
    fn add_listener(&self, listener: MediaEventListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

pub type MutationCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// The content tree of one page.
pub trait ContentTree: Send + Sync {
    /// Every playable element currently attached, in tree order.
    fn media_elements(&self) -> Vec<Arc<dyn MediaElement>>;
    /// Registers `callback` to run after any subtree insertion or removal.
    fn observe_mutations(&self, callback: MutationCallback) -> ObserverId;
    /// Detaches an observer. Unknown ids are ignored.
    fn unobserve_mutations(&self, id: ObserverId);
}
