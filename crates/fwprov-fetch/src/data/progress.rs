use super::artifact::Artifact;
use super::options::FetchPhase;

/// Snapshot passed to progress callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub artifact: Artifact,
    pub phase: FetchPhase,

    /// Body bytes accumulated so far.
    pub bytes_received: u64,

    /// Size of the chunk that produced this report, 0 on phase changes.
    pub chunk_len: u64,

    /// Total expected bytes, if the server sent Content-Length.
    pub total_bytes: Option<u64>,
}

impl Progress {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == FetchPhase::Completed
    }
}
