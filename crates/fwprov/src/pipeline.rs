//! The three stages of a run.
//!
//! 1. Resolve: boot, image, archive, strictly in that order. The first
//!    failure aborts before anything touches the output directory.
//! 2. Write: `BOOT.BIN` and `image.ub` into `<dir>/firmware/`.
//! 3. Expand: the archive onto `<dir>`.

use std::path::{Path, PathBuf};

use fwprov_archive::{ExpandReport, ExtractOptions};
use fwprov_fetch::{Artifact, FetchOptions, HttpClient, Payload, Resolver};
use fwprov_fs::AtomicWriteOptions;
use tracing::info;

use crate::config::FlashConfig;
use crate::error::{Error, Result};

pub const FIRMWARE_DIR: &str = "firmware";

/// Resolved artifacts carried from the resolver to the writer and expander.
#[derive(Debug, Clone)]
pub struct Payloads {
    pub boot: Payload,
    pub image: Payload,
    pub archive: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwarePaths {
    pub boot: PathBuf,
    pub image: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub firmware: FirmwarePaths,
    pub archive: ExpandReport,
}

pub struct Pipeline<C: HttpClient> {
    resolver: Resolver<C>,
    fetch_options: FetchOptions,
    extract_options: Option<ExtractOptions>,
}

impl<C: HttpClient> Pipeline<C> {
    pub fn new(client: C) -> Self {
        Self {
            resolver: Resolver::new(client),
            fetch_options: FetchOptions::default(),
            extract_options: None,
        }
    }

    pub fn fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    /// Overrides the options derived from the config.
    pub fn extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = Some(options);
        self
    }

    pub fn resolver(&self) -> &Resolver<C> {
        &self.resolver
    }

    pub async fn resolve(&self, config: &FlashConfig, artifact: Artifact) -> Result<Payload> {
        self.resolver
            .resolve(
                artifact,
                config.source(artifact),
                &config.release(),
                &self.fetch_options,
            )
            .await
            .map_err(Error::resolve(artifact))
    }

    pub async fn resolve_all(&self, config: &FlashConfig) -> Result<Payloads> {
        let boot = self.resolve(config, Artifact::Boot).await?;
        let image = self.resolve(config, Artifact::Image).await?;
        let archive = self.resolve(config, Artifact::Archive).await?;
        Ok(Payloads { boot, image, archive })
    }

    pub async fn run(&self, config: &FlashConfig) -> Result<Summary> {
        let payloads = self.resolve_all(config).await?;
        let firmware = write_firmware(&config.dir, &payloads.boot, &payloads.image)?;

        let options = self
            .extract_options
            .clone()
            .unwrap_or_else(|| config.extract_options());
        let archive = expand_archive(&config.dir, &payloads.archive, &options)?;

        Ok(Summary { firmware, archive })
    }
}

/// Write the boot and kernel images under `<dir>/firmware/`, replacing any existing files.
pub fn write_firmware(dir: &Path, boot: &Payload, image: &Payload) -> Result<FirmwarePaths> {
    let firmware_dir = dir.join(FIRMWARE_DIR);
    fwprov_fs::ensure_dir(dir)?;
    fwprov_fs::ensure_dir(&firmware_dir)?;

    let place = |payload: &Payload| -> Result<PathBuf> {
        let path = firmware_dir.join(payload.artifact.file_name());
        fwprov_fs::atomic_write(&path, &payload.bytes, AtomicWriteOptions::new())?;
        info!(
            artifact = %payload.artifact,
            path = %path.display(),
            bytes = payload.len(),
            "wrote"
        );
        Ok(path)
    };

    let boot = place(boot)?;
    let image = place(image)?;
    Ok(FirmwarePaths { boot, image })
}

pub fn expand_archive(dir: &Path, archive: &Payload, options: &ExtractOptions) -> Result<ExpandReport> {
    info!(origin = %archive.origin, root = %dir.display(), "expanding archive");
    Ok(fwprov_archive::expand(&archive.bytes, dir, options)?)
}
