use std::path::PathBuf;

use fwprov_fetch::{Artifact, FetchError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{artifact}: {source}")]
    Resolve {
        artifact: Artifact,
        #[source]
        source: FetchError,
    },

    #[error("writing firmware: {0}")]
    Write(#[from] fwprov_fs::Error),

    #[error("expanding archive: {0}")]
    Expand(#[from] fwprov_archive::Error),

    #[error("config '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("HTTP client: {0}")]
    Client(#[source] FetchError),
}

impl Error {
    pub(crate) fn resolve(artifact: Artifact) -> impl FnOnce(FetchError) -> Self {
        move |source| Error::Resolve { artifact, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
