//! Terminal progress for downloads and archive expansion.

mod tracker;

pub use tracker::{BARS, ProgressTracker, ProgressTrackerBuilder, Tracker, TrackerBuilder};

use std::sync::{Arc, Mutex};

use fwprov_archive::Progress as ExpandProgress;
use fwprov_fetch::{Artifact, FetchPhase, Progress};

/// Feeds download progress into one bar per artifact.
#[derive(Default)]
pub struct DownloadBars {
    current: Mutex<Option<ProgressTracker>>,
}

impl DownloadBars {
    pub fn callback(self: Arc<Self>) -> Arc<dyn Fn(&Progress) + Send + Sync> {
        Arc::new(move |progress: &Progress| self.update(progress))
    }

    fn update(&self, progress: &Progress) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        if progress.is_completed() {
            if let Some(tracker) = current.take() {
                tracker.finish();
            }
            return;
        }
        if progress.phase != FetchPhase::Downloading {
            return;
        }

        let tracker = current.get_or_insert_with(|| {
            let mut builder = ProgressTrackerBuilder::default()
                .with_prefix(progress.artifact.file_name())
                .with_finish("done");
            if let Some(len) = progress.total_bytes {
                builder = builder.with_len(len);
            }
            builder.build()
        });
        tracker.step(progress.chunk_len);
    }
}

/// Spinner showing the archive member being written.
///
/// Nothing is drawn until the first entry is reported, so the spinner does not
/// sit idle under the download bars.
#[derive(Default)]
pub struct ExpandSpinner {
    state: Mutex<SpinnerState>,
}

#[derive(Default)]
struct SpinnerState {
    tracker: Option<ProgressTracker>,
    last_bytes: u64,
    finished: bool,
}

impl ExpandSpinner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn callback(self: Arc<Self>) -> Arc<dyn Fn(ExpandProgress) + Send + Sync> {
        Arc::new(move |progress: ExpandProgress| self.update(progress))
    }

    fn update(&self, progress: ExpandProgress) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.finished {
            return;
        }
        let step = progress.bytes_processed.saturating_sub(state.last_bytes);
        state.last_bytes = progress.bytes_processed;

        let tracker = state.tracker.get_or_insert_with(|| {
            ProgressTrackerBuilder::default()
                .with_prefix(Artifact::Archive.file_name())
                .with_finish("expanded")
                .build()
        });
        tracker.step(step);
        if let Some(file) = progress.current_file {
            tracker.set_message(file.display().to_string());
        }
    }

    /// Whether a spinner has been drawn.
    pub fn is_started(&self) -> bool {
        self.state.lock().map(|s| s.tracker.is_some()).unwrap_or(false)
    }

    pub fn finish(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.finished = true;
        if let Some(tracker) = state.tracker.take() {
            tracker.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn entry(n: usize, bytes: u64) -> ExpandProgress {
        ExpandProgress {
            entries_processed: n,
            bytes_processed: bytes,
            current_file: Some(PathBuf::from(format!("etc/file{n}"))),
        }
    }

    #[test]
    fn spinner_starts_on_first_entry() {
        let spinner = ExpandSpinner::new();
        assert!(!spinner.is_started());

        let callback = spinner.clone().callback();
        callback(entry(1, 10));
        assert!(spinner.is_started());

        spinner.finish();
        assert!(!spinner.is_started());
    }

    #[test]
    fn finished_spinner_ignores_late_events() {
        let spinner = ExpandSpinner::new();
        let callback = spinner.clone().callback();
        spinner.finish();
        callback(entry(1, 10));
        assert!(!spinner.is_started());
    }

    #[test]
    fn download_bar_lives_until_completed() {
        let bars = Arc::new(DownloadBars::default());
        let callback = bars.clone().callback();
        let event = |phase, received| Progress {
            artifact: Artifact::Boot,
            phase,
            bytes_received: received,
            chunk_len: received,
            total_bytes: Some(8),
        };

        callback(&event(FetchPhase::Downloading, 4));
        assert!(bars.current.lock().unwrap().is_some());
        callback(&event(FetchPhase::Completed, 8));
        assert!(bars.current.lock().unwrap().is_none());
    }
}
