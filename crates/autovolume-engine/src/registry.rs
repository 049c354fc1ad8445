//! Membership of the sources one context tracks.
//!
//! The registry is the only owner of tracked sources. Everything else holds a
//! [`SourceKey`] and looks the source up, so a source evicted here is gone for
//! every pending re-evaluation as well. Stale entries are dropped during
//! [`MediaRegistry::for_each_live`], there is no separate sweep.

use std::collections::HashMap;
use std::sync::Arc;

use autovolume_core::VolumeReport;

use crate::error::SourceError;
use crate::source::MediaSource;
use crate::types::{SourceKey, SourceKind};

#[derive(Default)]
pub struct MediaRegistry {
    sources: HashMap<SourceKey, Arc<dyn MediaSource>>,
    order: Vec<SourceKey>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks `source` unless its underlying object is already tracked.
    /// Returns whether it was newly added.
    pub fn register(&mut self, source: Arc<dyn MediaSource>) -> bool {
        let key = source.key();
        if self.sources.contains_key(&key) {
            return false;
        }
        self.sources.insert(key, source);
        self.order.push(key);
        true
    }

    pub fn contains(&self, key: SourceKey) -> bool {
        self.sources.contains_key(&key)
    }

    pub fn get(&self, key: SourceKey) -> Option<Arc<dyn MediaSource>> {
        self.sources.get(&key).cloned()
    }

    /// Number of tracked sources still attached to their origin.
    pub fn count(&self) -> usize {
        self.sources.values().filter(|s| s.is_live()).count()
    }

    /// Runs `f` on every live source in registration order.
    ///
    /// Sources that are no longer live, or for which `f` fails, are evicted.
    /// Returns the evicted keys.
    pub fn for_each_live<F>(&mut self, mut f: F) -> Vec<SourceKey>
    where
        F: FnMut(&Arc<dyn MediaSource>) -> Result<(), SourceError>,
    {
        let mut evicted = Vec::new();
        for key in self.order.clone() {
            let Some(source) = self.sources.get(&key) else {
                continue;
            };
            if !source.is_live() || f(source).is_err() {
                evicted.push(key);
            }
        }
        for key in &evicted {
            self.evict(*key);
        }
        evicted
    }

    pub fn evict(&mut self, key: SourceKey) -> bool {
        let Some(source) = self.sources.remove(&key) else {
            return false;
        };
        source.unwatch();
        self.order.retain(|k| *k != key);
        true
    }

    /// Evicts everything, detaching all listeners.
    pub fn clear(&mut self) {
        for key in std::mem::take(&mut self.order) {
            if let Some(source) = self.sources.remove(&key) {
                source.unwatch();
            }
        }
    }

    /// Element to anchor indicators for sources that have no element of their
    /// own: the first playing unmuted element, else the first video.
    pub fn related_element(&self) -> Option<SourceKey> {
        let live_elements = || {
            self.order
                .iter()
                .filter_map(|key| self.sources.get(key))
                .filter(|s| s.kind() != SourceKind::Gain && s.is_live())
        };
        live_elements()
            .find(|s| s.is_playing() && !s.is_muted())
            .or_else(|| live_elements().find(|s| s.kind() == SourceKind::Video))
            .map(|s| s.key())
    }

    /// Loudest level across the context.
    ///
    /// Playing unmuted elements and open gain nodes count. When none of them
    /// qualify but elements exist, every attached element counts instead.
    pub fn volume_report(&self, max_volume_threshold: f64) -> VolumeReport {
        let mut report = VolumeReport::default();
        let mut loudest = 0.0_f64;
        let mut count_level = |report: &mut VolumeReport, level: f64| {
            report.has_media = true;
            loudest = loudest.max(level);
            if level >= max_volume_threshold {
                report.is_at_max_volume = true;
            }
        };

        let live = self
            .order
            .iter()
            .filter_map(|key| self.sources.get(key))
            .filter(|s| s.is_live())
            .collect::<Vec<_>>();

        for source in &live {
            report.total_elements += 1;
            let counts = match source.kind() {
                SourceKind::Gain => true,
                SourceKind::Audio | SourceKind::Video => source.is_playing() && !source.is_muted(),
            };
            if !counts {
                continue;
            }
            if let Ok(level) = source.level() {
                count_level(&mut report, level);
            }
        }

        if !report.has_media && report.total_elements > 0 {
            for source in live.iter().filter(|s| s.kind() != SourceKind::Gain) {
                if let Ok(level) = source.level() {
                    count_level(&mut report, level);
                }
            }
        }

        report.volume = loudest;
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MediaRegistry;
    use crate::error::SourceError;
    use crate::headless::{HeadlessDocument, HeadlessMediaElement};
    use crate::source::graph::{AudioGraphFactory, GainNode, GraphObserver};
    use crate::source::{ElementSource, GainSource, MediaSource};

    struct IgnoreGraphs;

    impl GraphObserver for IgnoreGraphs {
        fn gain_node_created(&self, _node: Arc<GainNode>) {}
    }

    fn element_source(element: &Arc<HeadlessMediaElement>) -> Arc<dyn MediaSource> {
        Arc::new(ElementSource::new(element.clone()))
    }

    #[test]
    fn rediscovering_same_element_is_a_noop() {
        let doc = HeadlessDocument::new();
        let element = HeadlessMediaElement::audio(0.5);
        doc.append(element.clone());

        let mut registry = MediaRegistry::new();
        assert!(registry.register(element_source(&element)));
        assert!(!registry.register(element_source(&element)));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn detached_element_is_evicted_during_pass() {
        let doc = HeadlessDocument::new();
        let kept = HeadlessMediaElement::audio(0.5);
        let removed = HeadlessMediaElement::video(0.5);
        doc.append_all([kept.clone(), removed.clone()]);

        let mut registry = MediaRegistry::new();
        registry.register(element_source(&kept));
        let removed_source = element_source(&removed);
        let removed_key = removed_source.key();
        registry.register(removed_source);

        doc.remove(&removed);
        let mut visited = Vec::new();
        let evicted = registry.for_each_live(|source| {
            visited.push(source.key());
            Ok(())
        });
        assert_eq!(evicted, vec![removed_key]);
        assert!(!visited.contains(&removed_key));
        assert!(!registry.contains(removed_key));

        // Re-attaching alone does not bring it back; only discovery does.
        doc.append(removed.clone());
        let mut visited_again = 0;
        registry.for_each_live(|_| {
            visited_again += 1;
            Ok(())
        });
        assert_eq!(visited_again, 1);
    }

    #[test]
    fn failed_read_evicts_source() {
        let doc = HeadlessDocument::new();
        let element = HeadlessMediaElement::audio(0.5);
        doc.append(element.clone());

        let mut registry = MediaRegistry::new();
        registry.register(element_source(&element));
        let evicted = registry.for_each_live(|_| {
            Err(SourceError::Rejected {
                reason: "foreign object".to_string(),
            })
        });
        assert_eq!(evicted.len(), 1);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn closed_graph_evicts_gain_source() {
        let graph = AudioGraphFactory::new(Arc::new(IgnoreGraphs)).create_graph();
        let node = graph.create_gain();
        let mut registry = MediaRegistry::new();
        registry.register(Arc::new(GainSource::new(node)));
        assert_eq!(registry.count(), 1);

        graph.close();
        assert_eq!(registry.count(), 0);
        let evicted = registry.for_each_live(|_| Ok(()));
        assert_eq!(evicted.len(), 1);
    }

    #[test]
    fn eviction_detaches_listeners() {
        let doc = HeadlessDocument::new();
        let element = HeadlessMediaElement::audio(0.5);
        doc.append(element.clone());

        let mut registry = MediaRegistry::new();
        let source = element_source(&element);
        source.watch(Arc::new(|| {}));
        let key = source.key();
        registry.register(source);
        assert_eq!(element.listener_count(), 1);

        registry.evict(key);
        assert_eq!(element.listener_count(), 0);
    }

    #[test]
    fn report_prefers_playing_unmuted_media() {
        let doc = HeadlessDocument::new();
        let quiet_playing = HeadlessMediaElement::audio(0.3);
        let loud_paused = HeadlessMediaElement::video(0.9);
        doc.append_all([quiet_playing.clone(), loud_paused.clone()]);
        quiet_playing.play();

        let mut registry = MediaRegistry::new();
        registry.register(element_source(&quiet_playing));
        registry.register(element_source(&loud_paused));

        let report = registry.volume_report(0.99);
        assert!(report.has_media);
        assert_eq!(report.volume, 0.3);
        assert_eq!(report.total_elements, 2);
        assert!(!report.is_at_max_volume);

        quiet_playing.pause();
        let fallback = registry.volume_report(0.99);
        assert!(fallback.has_media);
        assert_eq!(fallback.volume, 0.9);
    }

    #[test]
    fn related_element_prefers_playing_then_video() {
        let doc = HeadlessDocument::new();
        let audio = HeadlessMediaElement::audio(0.5);
        let video = HeadlessMediaElement::video(0.5);
        doc.append_all([audio.clone(), video.clone()]);

        let mut registry = MediaRegistry::new();
        let audio_source = element_source(&audio);
        let video_source = element_source(&video);
        let (audio_key, video_key) = (audio_source.key(), video_source.key());
        registry.register(audio_source);
        registry.register(video_source);

        assert_eq!(registry.related_element(), Some(video_key));
        audio.play();
        assert_eq!(registry.related_element(), Some(audio_key));
        audio.set_muted(true);
        assert_eq!(registry.related_element(), Some(video_key));
    }
}
