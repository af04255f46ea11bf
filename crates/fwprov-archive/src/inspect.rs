//! Read-only browsing of an archive, plus extraction of a single member.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use crate::entry::{EntryInfo, ExtractedEntry};
use crate::error::{Error, Result};
use crate::expand::{DeferredDirs, configure, prepare_root, unpack_entry};
use crate::format;
use crate::options::ExtractOptions;

/// Header metadata of every member, in archive order.
pub fn list_entries(bytes: &[u8]) -> Result<Vec<EntryInfo>> {
    let mut archive = format::open(bytes)?;
    let mut infos = Vec::new();
    for entry in format::entries(&mut archive)? {
        let entry = entry?;
        infos.push(EntryInfo::of(&entry).map_err(Error::Corrupted)?);
    }
    Ok(infos)
}

/// Header metadata of the member named `path`.
pub fn entry_info(bytes: &[u8], path: &str) -> Result<EntryInfo> {
    let mut archive = format::open(bytes)?;
    let wanted = member_key(Path::new(path));
    for entry in format::entries(&mut archive)? {
        let entry = entry?;
        if matches_member(&entry, &wanted) {
            return EntryInfo::of(&entry).map_err(Error::Corrupted);
        }
    }
    Err(not_found(path))
}

/// Contents of the regular file named `path`.
pub fn read_entry(bytes: &[u8], path: &str) -> Result<Vec<u8>> {
    let mut archive = format::open(bytes)?;
    let wanted = member_key(Path::new(path));
    for entry in format::entries(&mut archive)? {
        let mut entry = entry?;
        if !matches_member(&entry, &wanted) {
            continue;
        }
        if !EntryInfo::of(&entry).map_err(Error::Corrupted)?.kind.is_file() {
            return Err(Error::NotAFile {
                path: path.to_string(),
            });
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(Error::Corrupted)?;
        return Ok(content);
    }
    Err(not_found(path))
}

/// Extract only the member named `path` onto `destination`.
///
/// Same rules as a full expansion: sanitized path, existing file removed first.
pub fn extract_entry(
    bytes: &[u8],
    path: &str,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractedEntry> {
    let root = prepare_root(destination.as_ref())?;
    let mut archive = format::open(bytes)?;
    configure(&mut archive, options);
    let wanted = member_key(Path::new(path));

    for entry in format::entries(&mut archive)? {
        let mut entry = entry?;
        if !matches_member(&entry, &wanted) {
            continue;
        }
        let mut deferred = DeferredDirs::new(options.preserve_permissions);
        let extracted = unpack_entry(&mut entry, &root, &mut deferred);
        let applied = deferred.apply();
        let extracted = extracted?;
        applied?;
        return Ok(extracted);
    }
    Err(not_found(path))
}

/// Member names compare without `./` prefixes or trailing slashes.
fn member_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn matches_member<R: Read>(entry: &tar::Entry<'_, R>, wanted: &Path) -> bool {
    entry
        .path()
        .map(|p| member_key(&p) == wanted)
        .unwrap_or(false)
}

fn not_found(path: &str) -> Error {
    Error::EntryNotFound {
        path: path.to_string(),
    }
}
