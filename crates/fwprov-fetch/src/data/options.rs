use std::fmt;
use std::sync::Arc;

use super::progress::Progress;

/// Phases of a single artifact resolution.
///
/// Connecting → Downloading → Completed for remote sources; local reads
/// report only Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Connecting,
    Downloading,
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Configuration for resolving artifacts.
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Progress callback invoked on phase transitions and after every body chunk.
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl FetchOptions {
    pub fn on_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(&progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Artifact;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn report_without_callback_is_noop() {
        FetchOptions::default().report(Progress {
            artifact: Artifact::Boot,
            phase: FetchPhase::Completed,
            bytes_received: 1,
            chunk_len: 1,
            total_bytes: None,
        });
    }

    #[test]
    fn report_invokes_callback() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_cb = seen.clone();
        let options = FetchOptions::default().on_progress(Arc::new(move |p: &Progress| {
            seen_cb.store(p.bytes_received, Ordering::SeqCst);
        }));

        options.report(Progress {
            artifact: Artifact::Image,
            phase: FetchPhase::Downloading,
            bytes_received: 42,
            chunk_len: 42,
            total_bytes: Some(100),
        });
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
