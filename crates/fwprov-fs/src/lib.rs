//! Filesystem primitives used when placing firmware on disk.
//!
//! Writes go through a temporary file in the destination directory which is
//! then renamed over the target, so a reader never observes a half-written
//! boot image.

mod error;

pub use error::{Error, Result};

use std::io::Write;
use std::path::Path;

const TEMP_PREFIX: &str = ".fwprov-";

#[cfg(unix)]
const DEFAULT_PERMISSIONS: u32 = 0o644;

#[derive(Clone, Copy, Debug)]
pub struct AtomicWriteOptions {
    permissions: Option<u32>,
    sync:        bool,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self { Self::new() }
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            permissions: Some(DEFAULT_PERMISSIONS),
            #[cfg(not(unix))]
            permissions: None,
            sync:        true,
        }
    }

    #[cfg(unix)]
    pub fn permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }

    #[cfg(not(unix))]
    pub fn permissions(self, _mode: u32) -> Self { self }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Create `path` and every missing parent.
///
/// An existing directory is fine; an existing non-directory is an error.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    std::fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the contents of `path` with `content`, overwriting any existing file.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;

    tmp.write_all(content).map_err(write_err)?;

    #[cfg(unix)]
    if let Some(mode) = options.permissions {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(write_err)?;
    }

    if options.sync {
        tmp.as_file().sync_all().map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Whether the process runs with an effective uid of 0.
#[cfg(unix)]
pub fn is_privileged() -> bool { nix::unistd::geteuid().is_root() }

#[cfg(not(unix))]
pub fn is_privileged() -> bool { false }
