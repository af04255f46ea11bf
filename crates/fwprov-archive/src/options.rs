use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Whether numeric uid/gid recorded in the archive are applied to extracted entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OwnershipPolicy {
    /// Preserve only when running as root; chown fails otherwise.
    #[default]
    Auto,
    Always,
    Never,
}

impl OwnershipPolicy {
    pub fn preserve(self) -> bool {
        match self {
            OwnershipPolicy::Auto => fwprov_fs::is_privileged(),
            OwnershipPolicy::Always => true,
            OwnershipPolicy::Never => false,
        }
    }
}

/// What to do when a single member fails to extract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EntryErrorPolicy {
    /// Stop at the first failing member and return its error.
    #[default]
    Abort,
    /// Log the failure, record it in the report and continue.
    Skip,
}

#[derive(Clone)]
pub struct ExtractOptions {
    pub ownership: OwnershipPolicy,
    pub on_entry_error: EntryErrorPolicy,
    pub preserve_permissions: bool,
    pub preserve_mtime: bool,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ownership: OwnershipPolicy::default(),
            on_entry_error: EntryErrorPolicy::default(),
            preserve_permissions: true,
            preserve_mtime: true,
            on_progress: None,
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("ownership", &self.ownership)
            .field("on_entry_error", &self.on_entry_error)
            .field("preserve_permissions", &self.preserve_permissions)
            .field("preserve_mtime", &self.preserve_mtime)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub entries_processed: usize,
    pub bytes_processed: u64,
    pub current_file: Option<PathBuf>,
}

impl ExtractOptions {
    pub fn ownership(mut self, policy: OwnershipPolicy) -> Self {
        self.ownership = policy;
        self
    }

    pub fn on_entry_error(mut self, policy: EntryErrorPolicy) -> Self {
        self.on_entry_error = policy;
        self
    }

    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    pub fn preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(progress);
        }
    }
}
