use std::fmt;
use std::sync::Arc;

use autovolume_core::{AdjustmentKind, Settings};

/// Identity of a tracked source: the address of the underlying host object.
///
/// Re-discovering the same element or gain node yields the same key, which is
/// what makes registration idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey(usize);

impl SourceKey {
    pub fn of<T: ?Sized>(object: &Arc<T>) -> Self {
        Self(Arc::as_ptr(object) as *const () as usize)
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src-{:x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Audio,
    Video,
    Gain,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Gain => "gain",
        }
    }
}

/// Where the indicator for an adjustment should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorAnchor {
    Source(SourceKey),
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEvent {
    pub anchor: IndicatorAnchor,
    pub kind: AdjustmentKind,
    pub level_percent: i64,
}

/// Diagnostic events published by a context.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SourceRegistered {
        key: SourceKey,
        kind: SourceKind,
    },
    SourceEvicted {
        key: SourceKey,
    },
    Adjusted {
        key: SourceKey,
        kind: AdjustmentKind,
        from_percent: i64,
        to_percent: i64,
    },
    MonitoringChanged {
        active: bool,
    },
    SettingsReplaced {
        settings: Settings,
    },
}
