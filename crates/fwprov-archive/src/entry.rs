use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
    HardLink { target: PathBuf },
    /// Devices, fifos and anything else tar can carry.
    Other,
}

impl EntryKind {
    pub(crate) fn of<R: Read>(entry: &tar::Entry<'_, R>) -> Self {
        let entry_type = entry.header().entry_type();
        let link = || {
            entry
                .link_name()
                .ok()
                .flatten()
                .map(|p| p.into_owned())
                .unwrap_or_default()
        };

        if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_symlink() {
            EntryKind::Symlink { target: link() }
        } else if entry_type.is_hard_link() {
            EntryKind::HardLink { target: link() }
        } else if entry_type.is_file() || entry_type.is_contiguous() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Kinds that occupy a single non-directory path and are replaced on re-extraction.
    pub fn replaces_existing(&self) -> bool {
        matches!(
            self,
            EntryKind::File | EntryKind::Symlink { .. } | EntryKind::HardLink { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink { .. } => "symlink",
            EntryKind::HardLink { .. } => "hardlink",
            EntryKind::Other => "special",
        }
    }
}

/// Header metadata of one archive member.
#[derive(Clone, Debug)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    pub mode: Option<u32>,
    pub uid: Option<u64>,
    pub gid: Option<u64>,
    pub mtime: Option<u64>,
}

impl EntryInfo {
    pub(crate) fn of<R: Read>(entry: &tar::Entry<'_, R>) -> std::io::Result<Self> {
        let header = entry.header();
        Ok(Self {
            path: entry.path()?.into_owned(),
            kind: EntryKind::of(entry),
            size: header.size().unwrap_or(0),
            mode: header.mode().ok(),
            uid: header.uid().ok(),
            gid: header.gid().ok(),
            mtime: header.mtime().ok(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
    /// An existing file at the target was removed first.
    pub replaced: bool,
}

#[derive(Clone, Debug)]
pub struct SkippedEntry {
    pub original_path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct ExpandReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ExpandReport {
    pub fn replaced_count(&self) -> usize {
        self.entries.iter().filter(|e| e.replaced).count()
    }

    pub fn find(&self, original: impl AsRef<Path>) -> Option<&ExtractedEntry> {
        let original = original.as_ref();
        self.entries.iter().find(|e| e.original_path == original)
    }

    pub(crate) fn push(&mut self, entry: ExtractedEntry) {
        self.entry_count += 1;
        self.total_bytes += entry.size;
        self.entries.push(entry);
    }
}
