use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("payload is not gzip-compressed")]
    NotGzip,

    #[error("archive is corrupted: {0}")]
    Corrupted(#[source] io::Error),

    #[error("entry '{}' resolves outside the output directory ('{}')", entry.display(), resolved.display())]
    PathEscape { entry: PathBuf, resolved: PathBuf },

    #[error("entry path is not valid")]
    InvalidPath,

    #[error("failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to remove existing '{}': {source}", path.display())]
    RemoveFailed { path: PathBuf, source: io::Error },

    #[error("no entry named '{path}' in archive")]
    EntryNotFound { path: String },

    #[error("entry '{path}' is not a regular file")]
    NotAFile { path: String },

    #[error("output directory unusable: {source}")]
    Destination { source: fwprov_fs::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<fwprov_fs::Error> for Error {
    fn from(e: fwprov_fs::Error) -> Self {
        Self::Destination { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
