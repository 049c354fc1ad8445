use std::sync::Arc;

use parking_lot::Mutex;

use autovolume_core::clamp_level;

use crate::content::{ListenerId, MediaElement, MediaTag};
use crate::error::SourceError;
use crate::source::{MediaSource, SourceChangeCallback};
use crate::types::{SourceKey, SourceKind};

pub struct ElementSource {
    element: Arc<dyn MediaElement>,
    key: SourceKey,
    listener: Mutex<Option<ListenerId>>,
}

impl ElementSource {
    pub fn new(element: Arc<dyn MediaElement>) -> Self {
        let key = SourceKey::of(&element);
        Self {
            element,
            key,
            listener: Mutex::new(None),
        }
    }

    pub fn element(&self) -> &Arc<dyn MediaElement> {
        &self.element
    }
}

impl MediaSource for ElementSource {
    fn key(&self) -> SourceKey {
        self.key
    }

    fn kind(&self) -> SourceKind {
        match self.element.tag() {
            MediaTag::Audio => SourceKind::Audio,
            MediaTag::Video => SourceKind::Video,
        }
    }

    fn level(&self) -> Result<f64, SourceError> {
        if !self.element.is_connected() {
            return Err(SourceError::Detached);
        }
        self.element.volume()
    }

    fn set_level(&self, level: f64) -> Result<(), SourceError> {
        if !self.element.is_connected() {
            return Err(SourceError::Detached);
        }
        self.element.set_volume(clamp_level(level))
    }

    fn is_muted(&self) -> bool {
        self.element.is_muted()
    }

    fn is_live(&self) -> bool {
        self.element.is_connected()
    }

    fn is_playing(&self) -> bool {
        !self.element.is_paused()
    }

    fn watch(&self, on_change: SourceChangeCallback) {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            return;
        }
        let id = self
            .element
            .add_listener(Arc::new(move |_event| on_change()));
        *listener = Some(id);
    }

    fn unwatch(&self) {
        if let Some(id) = self.listener.lock().take() {
            self.element.remove_listener(id);
        }
    }
}
