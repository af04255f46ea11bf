use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tracing::{debug, info};
use url::Url;

use crate::core::release_url;
use crate::data::{Artifact, FetchOptions, FetchPhase, Payload, Progress, Release, Source};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Turns a source string into an in-memory [`Payload`].
pub struct Resolver<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Resolver<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolve one artifact.
    ///
    /// Remote sources are treated as a release base URL; local sources are a
    /// file, or a directory holding the artifact under its fixed name.
    pub async fn resolve(
        &self,
        artifact: Artifact,
        source: &str,
        release: &Release,
        options: &FetchOptions,
    ) -> Result<Payload> {
        match Source::parse(source)? {
            Source::Remote(base) => {
                let url = release_url(&base, release, artifact)?;
                let bytes = self.download(artifact, &url, options).await?;
                Ok(Payload {
                    artifact,
                    origin: Source::Remote(url),
                    bytes,
                })
            }
            Source::Local(path) => {
                let (path, bytes) = read_local(artifact, &path).await?;
                options.report(Progress {
                    artifact,
                    phase: FetchPhase::Completed,
                    bytes_received: bytes.len() as u64,
                    chunk_len: 0,
                    total_bytes: Some(bytes.len() as u64),
                });
                Ok(Payload {
                    artifact,
                    origin: Source::Local(path),
                    bytes,
                })
            }
        }
    }

    /// Stream a URL into memory, reporting progress after each chunk.
    pub async fn download(
        &self,
        artifact: Artifact,
        url: &Url,
        options: &FetchOptions,
    ) -> Result<Bytes> {
        info!(%artifact, %url, "downloading");
        options.report(Progress {
            artifact,
            phase: FetchPhase::Connecting,
            bytes_received: 0,
            chunk_len: 0,
            total_bytes: None,
        });

        let network_err = |e: C::Error| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url.as_str()).await.map_err(network_err)?;
        if !response.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        let total_bytes = response.content_length;
        let mut buffer = match total_bytes {
            Some(len) => BytesMut::with_capacity(len.min(MAX_PREALLOC) as usize),
            None => BytesMut::new(),
        };
        let mut body = response.body;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network_err)?;
            buffer.extend_from_slice(&chunk);
            options.report(Progress {
                artifact,
                phase: FetchPhase::Downloading,
                bytes_received: buffer.len() as u64,
                chunk_len: chunk.len() as u64,
                total_bytes,
            });
        }

        let received = buffer.len() as u64;
        if let Some(expected) = total_bytes {
            if expected != received {
                return Err(FetchError::Incomplete {
                    url: url.to_string(),
                    expected,
                    received,
                });
            }
        }

        options.report(Progress {
            artifact,
            phase: FetchPhase::Completed,
            bytes_received: received,
            chunk_len: 0,
            total_bytes,
        });
        debug!(%artifact, bytes = received, "download complete");

        Ok(buffer.freeze())
    }
}

/// Read an artifact from disk; directories are searched for the artifact's file name.
async fn read_local(artifact: Artifact, path: &Path) -> Result<(PathBuf, Bytes)> {
    let local_err = |path: &Path, source| FetchError::LocalRead {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| local_err(path, e))?;
    let file = if metadata.is_dir() {
        path.join(artifact.file_name())
    } else {
        path.to_path_buf()
    };

    let bytes = tokio::fs::read(&file)
        .await
        .map_err(|e| local_err(&file, e))?;
    info!(%artifact, path = %file.display(), bytes = bytes.len(), "read local artifact");

    Ok((file, Bytes::from(bytes)))
}
