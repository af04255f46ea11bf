use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    pub original: PathBuf,
    /// Entry path with `.` removed, relative to the base.
    pub relative: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an entry path against `base`, rejecting anything that would land outside it.
///
/// Absolute paths and any `..` component are errors. `tar` refuses to unpack
/// `..` even when it stays inside the root, so rejecting it here keeps an
/// existing file from being removed for an entry that can never be written.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();
    let escape = |resolved: PathBuf| Error::PathEscape {
        entry: entry_path.to_path_buf(),
        resolved,
    };

    let mut relative = PathBuf::new();
    for component in entry_path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(escape(base.join(entry_path))),
            Component::RootDir | Component::Prefix(_) => {
                return Err(escape(entry_path.to_path_buf()));
            }
        }
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved: base.join(&relative),
        relative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/srv/sd")
        } else {
            Path::new("/srv/sd")
        }
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_path("etc/hostname", base()).unwrap();
        assert_eq!(result.original, Path::new("etc/hostname"));
        assert_eq!(result.resolved, base().join("etc/hostname"));
    }

    #[test]
    fn current_dir_components_dropped() {
        let result = sanitize_path("./etc/./init.d/rcS", base()).unwrap();
        assert_eq!(result.relative, Path::new("etc/init.d/rcS"));
    }

    #[test]
    fn root_entry_resolves_to_base() {
        let result = sanitize_path("./", base()).unwrap();
        assert_eq!(result.resolved, base());
        assert!(result.relative.as_os_str().is_empty());
    }

    #[test]
    fn inner_parent_dir_rejected() {
        let result = sanitize_path("usr/lib/../bin/tool", base());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[test]
    fn parent_escape_rejected() {
        let result = sanitize_path("../../etc/passwd", base());
        assert!(matches!(result, Err(Error::PathEscape { .. })));

        let result = sanitize_path("etc/../../passwd", base());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[test]
    fn absolute_rejected() {
        let malicious = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let result = sanitize_path(malicious, base());
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }
}
