//! In-memory content tree for simulators and tests.
//!
//! Elements behave like their browser counterparts where the engine can tell
//! the difference: volume writes outside `[0, 1]` are rejected, a
//! `VolumeChange` is dispatched only when volume or mute actually change, and
//! removal from the document detaches the element.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::content::{
    ContentTree, ListenerId, MediaElement, MediaEvent, MediaEventListener, MediaTag,
    MutationCallback, ObserverId,
};
use crate::error::SourceError;

#[derive(Default)]
pub struct HeadlessDocument {
    elements: Mutex<Vec<Arc<HeadlessMediaElement>>>,
    observers: Mutex<Vec<(ObserverId, MutationCallback)>>,
    next_observer: AtomicU64,
}

impl HeadlessDocument {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn append(&self, element: Arc<HeadlessMediaElement>) {
        self.append_all([element]);
    }

    /// Inserts a whole subtree at once; observers see one mutation.
    pub fn append_all(&self, elements: impl IntoIterator<Item = Arc<HeadlessMediaElement>>) {
        {
            let mut attached = self.elements.lock();
            for element in elements {
                element.connected.store(true, Ordering::Release);
                if !attached.iter().any(|e| Arc::ptr_eq(e, &element)) {
                    attached.push(element);
                }
            }
        }
        self.notify_mutation();
    }

    pub fn remove(&self, element: &Arc<HeadlessMediaElement>) {
        let removed = {
            let mut attached = self.elements.lock();
            let before = attached.len();
            attached.retain(|e| !Arc::ptr_eq(e, element));
            attached.len() != before
        };
        if removed {
            element.connected.store(false, Ordering::Release);
            self.notify_mutation();
        }
    }

    /// A structural change that adds no media, such as inserting a plain container.
    pub fn touch(&self) {
        self.notify_mutation();
    }

    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn notify_mutation(&self) {
        let observers: Vec<MutationCallback> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer();
        }
    }
}

impl ContentTree for HeadlessDocument {
    fn media_elements(&self) -> Vec<Arc<dyn MediaElement>> {
        self.elements
            .lock()
            .iter()
            .map(|e| Arc::clone(e) as Arc<dyn MediaElement>)
            .collect()
    }

    fn observe_mutations(&self, callback: MutationCallback) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers.lock().push((id, callback));
        id
    }

    fn unobserve_mutations(&self, id: ObserverId) {
        self.observers.lock().retain(|(observer, _)| *observer != id);
    }
}

#[derive(Debug, Clone, Copy)]
struct PlaybackState {
    volume: f64,
    muted: bool,
    paused: bool,
    playback_rate: f64,
}

pub struct HeadlessMediaElement {
    tag: MediaTag,
    state: Mutex<PlaybackState>,
    connected: AtomicBool,
    listeners: Mutex<Vec<(ListenerId, MediaEventListener)>>,
    next_listener: AtomicU64,
}

impl HeadlessMediaElement {
    pub fn new(tag: MediaTag, volume: f64) -> Arc<Self> {
        Arc::new(Self {
            tag,
            state: Mutex::new(PlaybackState {
                volume: volume.clamp(0.0, 1.0),
                muted: false,
                paused: true,
                playback_rate: 1.0,
            }),
            connected: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    pub fn audio(volume: f64) -> Arc<Self> {
        Self::new(MediaTag::Audio, volume)
    }

    pub fn video(volume: f64) -> Arc<Self> {
        Self::new(MediaTag::Video, volume)
    }

    pub fn current_volume(&self) -> f64 {
        self.state.lock().volume
    }

    /// Volume change made by page script or the native controls.
    pub fn set_page_volume(&self, volume: f64) -> Result<(), SourceError> {
        self.write_volume(volume)
    }

    pub fn set_muted(&self, muted: bool) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.muted != muted;
            state.muted = muted;
            changed
        };
        if changed {
            self.dispatch(MediaEvent::VolumeChange);
        }
    }

    pub fn play(&self) {
        self.state.lock().paused = false;
        self.dispatch(MediaEvent::Play);
    }

    pub fn pause(&self) {
        self.state.lock().paused = true;
    }

    pub fn load(&self) {
        self.dispatch(MediaEvent::LoadedMetadata);
        self.dispatch(MediaEvent::LoadedData);
    }

    pub fn set_playback_rate(&self, rate: f64) {
        self.state.lock().playback_rate = rate;
        self.dispatch(MediaEvent::RateChange);
    }

    pub fn playback_rate(&self) -> f64 {
        self.state.lock().playback_rate
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn write_volume(&self, volume: f64) -> Result<(), SourceError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SourceError::Rejected {
                reason: format!("volume {volume} outside [0, 1]"),
            });
        }
        let changed = {
            let mut state = self.state.lock();
            let changed = state.volume != volume;
            state.volume = volume;
            changed
        };
        if changed {
            self.dispatch(MediaEvent::VolumeChange);
        }
        Ok(())
    }

    fn dispatch(&self, event: MediaEvent) {
        let listeners = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(event);
        }
    }
}

impl MediaElement for HeadlessMediaElement {
    fn tag(&self) -> MediaTag {
        self.tag
    }

    fn volume(&self) -> Result<f64, SourceError> {
        Ok(self.current_volume())
    }

    fn set_volume(&self, volume: f64) -> Result<(), SourceError> {
        self.write_volume(volume)
    }

    fn is_muted(&self) -> bool {
        self.state.lock().muted
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn add_listener(&self, listener: MediaEventListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }
}
