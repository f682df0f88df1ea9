//! Optional outcome channel for best-effort translation.

use std::fmt;

use parking_lot::Mutex;

/// Skip decision taken while translating one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEvent {
    /// Source field without a destination counterpart
    Unmatched { path: String, field: String },
    /// Names matched but the declared kinds diverge; the value was dropped
    KindMismatch {
        path: String,
        field: String,
        source: String,
        destination: String,
    },
    /// Source tokens the destination enumeration does not define
    EnumTokensDropped {
        path: String,
        field: String,
        tokens: Vec<String>,
    },
    /// No source token matched; the destination kept its default
    EnumUnmatched { path: String, field: String },
}

impl fmt::Display for TranslationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationEvent::Unmatched { path, field } => {
                write!(f, "{}: field '{}' has no destination", path, field)
            }
            TranslationEvent::KindMismatch {
                path,
                field,
                source,
                destination,
            } => write!(
                f,
                "{}: field '{}' changed kind from {} to {}",
                path, field, source, destination
            ),
            TranslationEvent::EnumTokensDropped {
                path,
                field,
                tokens,
            } => write!(
                f,
                "{}: field '{}' dropped tokens [{}]",
                path,
                field,
                tokens.join(", ")
            ),
            TranslationEvent::EnumUnmatched { path, field } => {
                write!(f, "{}: field '{}' matched no destination token", path, field)
            }
        }
    }
}

/// Receives translation events. Implementations must tolerate concurrent
/// calls from batch translation.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: TranslationEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: TranslationEvent) {}
}

/// Collects events for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TranslationEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    pub fn events(&self) -> Vec<TranslationEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<TranslationEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, event: TranslationEvent) {
        self.events.lock().push(event);
    }
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: TranslationEvent) {
        tracing::debug!("{}", event);
    }
}
