use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::entry::{EntryKind, ExpandReport, ExtractedEntry, SkippedEntry};
use crate::error::{Error, Result};
use crate::format;
use crate::options::{EntryErrorPolicy, ExtractOptions, Progress};
use crate::sanitize::sanitize_path;

/// Expand every entry of a gzip tar onto `destination`, in archive order.
///
/// Existing files at an entry's path are removed before the entry is written.
/// Directory permissions are applied after all entries so read-only
/// directories in the archive do not block their own contents.
pub fn expand(
    bytes: &[u8],
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExpandReport> {
    let root = prepare_root(destination.as_ref())?;
    let mut archive = format::open(bytes)?;
    configure(&mut archive, options);

    let mut deferred = DeferredDirs::new(options.preserve_permissions);
    let expanded = expand_entries(&mut archive, &root, options, &mut deferred);
    // Directory modes are restored even when an entry failed; the entry error wins.
    let applied = deferred.apply();
    let report = expanded?;
    applied?;

    debug!(
        root = %root.display(),
        entries = report.entry_count,
        bytes = report.total_bytes,
        replaced = report.replaced_count(),
        skipped = report.skipped.len(),
        "archive expanded"
    );
    Ok(report)
}

fn expand_entries<R: Read>(
    archive: &mut tar::Archive<R>,
    root: &Path,
    options: &ExtractOptions,
    deferred: &mut DeferredDirs,
) -> Result<ExpandReport> {
    let mut report = ExpandReport::default();
    let mut processed = 0usize;

    for entry in format::entries(archive)? {
        let mut entry = entry?;
        let original = entry.path().map(|p| p.into_owned()).unwrap_or_default();

        match unpack_entry(&mut entry, root, deferred) {
            Ok(extracted) => report.push(extracted),
            Err(err) if options.on_entry_error == EntryErrorPolicy::Skip => {
                warn!(entry = %original.display(), error = %err, "skipping archive entry");
                report.skipped.push(SkippedEntry {
                    original_path: original.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }

        processed += 1;
        options.report(Progress {
            entries_processed: processed,
            bytes_processed: report.total_bytes,
            current_file: Some(original),
        });
    }
    Ok(report)
}

/// Create the destination and return its canonical form; containment checks compare against it.
pub(crate) fn prepare_root(destination: &Path) -> Result<PathBuf> {
    fwprov_fs::ensure_dir(destination)?;
    destination
        .canonicalize()
        .map_err(|source| Error::ExtractionFailed {
            path: destination.to_path_buf(),
            source,
        })
}

pub(crate) fn configure<R: Read>(archive: &mut tar::Archive<R>, options: &ExtractOptions) {
    archive.set_preserve_permissions(options.preserve_permissions);
    archive.set_preserve_mtime(options.preserve_mtime);
    archive.set_preserve_ownerships(options.ownership.preserve());
    archive.set_overwrite(true);
    archive.set_unpack_xattrs(false);
}

/// Sanitize, delete-then-extract a single entry under `root`.
pub(crate) fn unpack_entry<R: Read>(
    entry: &mut tar::Entry<'_, R>,
    root: &Path,
    deferred: &mut DeferredDirs,
) -> Result<ExtractedEntry> {
    let raw_path = entry.path().map_err(|_| Error::InvalidPath)?.into_owned();
    let sanitized = sanitize_path(&raw_path, root)?;
    let kind = EntryKind::of(entry);
    let size = entry.header().size().unwrap_or(0);
    let mode = entry.header().mode().ok();

    let replaced = if kind.replaces_existing() {
        remove_existing(&sanitized.resolved, root, &raw_path)?
    } else {
        false
    };

    let unpacked = entry
        .unpack_in(root)
        .map_err(|source| Error::ExtractionFailed {
            path: sanitized.resolved.clone(),
            source,
        })?;
    if !unpacked {
        return Err(Error::PathEscape {
            entry: raw_path,
            resolved: sanitized.resolved,
        });
    }

    if kind.is_directory() && !sanitized.relative.as_os_str().is_empty() {
        if let Some(mode) = mode {
            deferred.defer(&sanitized.resolved, mode)?;
        }
    }

    debug!(
        entry = %raw_path.display(),
        kind = kind.label(),
        size,
        replaced,
        "extracted"
    );

    Ok(ExtractedEntry {
        original_path: raw_path,
        target_path: sanitized.resolved,
        size,
        kind,
        replaced,
    })
}

/// Remove whatever non-directory sits at `target`. Returns whether something was removed.
///
/// The parent is canonicalized first so a symlink planted by an earlier
/// entry cannot redirect the removal outside `root`.
fn remove_existing(target: &Path, root: &Path, entry: &Path) -> Result<bool> {
    let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
        return Ok(false);
    };
    let remove_err = |source| Error::RemoveFailed {
        path: target.to_path_buf(),
        source,
    };

    let parent = match parent.canonicalize() {
        Ok(parent) => parent,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(remove_err(e)),
    };
    if !parent.starts_with(root) {
        return Err(Error::PathEscape {
            entry: entry.to_path_buf(),
            resolved: parent.join(name),
        });
    }

    let existing = parent.join(name);
    match std::fs::symlink_metadata(&existing) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => {
            std::fs::remove_file(&existing).map_err(remove_err)?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(remove_err(e)),
    }
}

/// Directory modes applied once every entry has been written, deepest first.
pub(crate) struct DeferredDirs {
    preserve: bool,
    dirs: Vec<(PathBuf, u32)>,
}

impl DeferredDirs {
    pub(crate) fn new(preserve: bool) -> Self {
        Self {
            preserve,
            dirs: Vec::new(),
        }
    }

    #[cfg(unix)]
    pub(crate) fn defer(&mut self, path: &Path, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = if self.preserve { mode & 0o7777 } else { mode & 0o777 };
        if mode & 0o700 != 0o700 {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode | 0o700))
                .map_err(|source| Error::ExtractionFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        self.dirs.push((path.to_path_buf(), mode));
        Ok(())
    }

    #[cfg(not(unix))]
    pub(crate) fn defer(&mut self, _path: &Path, _mode: u32) -> Result<()> {
        Ok(())
    }

    pub(crate) fn apply(self) -> Result<()> {
        #[cfg(unix)]
        for (path, mode) in self.dirs.into_iter().rev() {
            use std::os::unix::fs::PermissionsExt;

            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
                .map_err(|source| Error::ExtractionFailed { path, source })?;
        }
        Ok(())
    }
}
