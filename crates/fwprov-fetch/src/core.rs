//! Pure transformations: no I/O happens here.

use std::path::PathBuf;

use url::Url;

use crate::data::{Artifact, Release, Source};
use crate::error::{FetchError, Result};

const DOWNLOAD_SEGMENT: &str = "download";

/// A source is remote when it starts with an HTTP(S) scheme; anything else is a path.
pub fn is_remote(source: &str) -> bool {
    let source = source.trim_start().as_bytes();
    let starts_with = |prefix: &[u8]| {
        source.len() >= prefix.len() && source[..prefix.len()].eq_ignore_ascii_case(prefix)
    };
    starts_with(b"http://") || starts_with(b"https://")
}

impl Source {
    /// Classify a user-supplied source string.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::EmptySource);
        }

        if is_remote(trimmed) {
            let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Source::Remote(url))
        } else {
            Ok(Source::Local(PathBuf::from(trimmed)))
        }
    }
}

/// Build `<base>/download/v<version>/<file><suffix>` for an artifact.
///
/// The tag and file name are pushed as single path segments, so `/`, `?` and
/// `#` in a version or variant are percent-encoded instead of changing the
/// requested resource.
pub fn release_url(base: &Url, release: &Release, artifact: Artifact) -> Result<Url> {
    if release.version().is_empty() {
        return Err(FetchError::MissingVersion);
    }

    let suffix = if artifact.takes_variant() {
        release.suffix()
    } else {
        String::new()
    };
    let file = format!("{}{suffix}", artifact.file_name());

    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .push(DOWNLOAD_SEGMENT)
        .push(&release.tag())
        .push(&file);
    Ok(url)
}
