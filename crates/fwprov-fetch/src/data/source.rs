use std::fmt;
use std::path::PathBuf;

use url::Url;

/// Where an artifact is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Release version plus optional hardware variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Release {
    version: String,
    variant: Option<String>,
}

impl Release {
    /// `version` may carry a leading `v`; it is stripped once so `1.4.2` and
    /// `v1.4.2` name the same tag. Blank variants count as no variant.
    pub fn new(version: impl AsRef<str>, variant: Option<&str>) -> Self {
        let version = version.as_ref().trim();
        let version = version
            .strip_prefix('v')
            .or_else(|| version.strip_prefix('V'))
            .unwrap_or(version)
            .to_string();
        let variant = variant
            .map(|v| v.trim().trim_start_matches('.').to_string())
            .filter(|v| !v.is_empty());
        Self { version, variant }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Tag segment used by the release server, e.g. `v1.4.2`.
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    /// `.variant`, or empty when no variant is set.
    pub fn suffix(&self) -> String {
        self.variant
            .as_deref()
            .map(|v| format!(".{v}"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_prefix_stripped_once() {
        assert_eq!(Release::new("v1.4.2", None).tag(), "v1.4.2");
        assert_eq!(Release::new("1.4.2", None).tag(), "v1.4.2");
        assert_eq!(Release::new(" V2.0 ", None).version(), "2.0");
    }

    #[test]
    fn blank_variant_is_none() {
        let release = Release::new("1.0", Some("  "));
        assert_eq!(release.suffix(), "");
    }

    #[test]
    fn variant_suffix() {
        let release = Release::new("1.0", Some("rev2"));
        assert_eq!(release.suffix(), ".rev2");
        let dotted = Release::new("1.0", Some(".rev2"));
        assert_eq!(dotted.suffix(), ".rev2");
    }
}
