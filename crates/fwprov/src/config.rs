//! Run configuration: built-in defaults, optionally overlaid by a TOML file,
//! then by command-line flags.

use std::path::{Path, PathBuf};

use fwprov_archive::{EntryErrorPolicy, ExtractOptions, OwnershipPolicy};
use fwprov_fetch::Release;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_SOURCE: &str = "https://github.com/apollo-lhc/SM_ZYNQ_FW/releases/";
pub const DEFAULT_VERSION: &str = "1.4.2";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// Keep archive uid/gid when running as root.
    #[default]
    Auto,
    Always,
    Never,
}

impl From<Ownership> for OwnershipPolicy {
    fn from(value: Ownership) -> Self {
        match value {
            Ownership::Auto => OwnershipPolicy::Auto,
            Ownership::Always => OwnershipPolicy::Always,
            Ownership::Never => OwnershipPolicy::Never,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlashConfig {
    pub boot: String,
    pub image: String,
    pub tar: String,
    pub version: String,
    pub variant: Option<String>,
    pub dir: PathBuf,
    pub skip_bad_entries: bool,
    pub ownership: Ownership,
    /// Apply the mode bits recorded in the archive.
    pub preserve_permissions: bool,
    /// Apply the modification times recorded in the archive.
    pub preserve_mtime: bool,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            boot: DEFAULT_SOURCE.to_string(),
            image: DEFAULT_SOURCE.to_string(),
            tar: DEFAULT_SOURCE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            variant: None,
            dir: PathBuf::from("."),
            skip_bad_entries: false,
            ownership: Ownership::Auto,
            preserve_permissions: true,
            preserve_mtime: true,
        }
    }
}

impl FlashConfig {
    /// Read a TOML file; keys it omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn release(&self) -> Release {
        Release::new(&self.version, self.variant.as_deref())
    }

    /// Source string for an artifact, in resolution order.
    pub fn source(&self, artifact: fwprov_fetch::Artifact) -> &str {
        match artifact {
            fwprov_fetch::Artifact::Boot => &self.boot,
            fwprov_fetch::Artifact::Image => &self.image,
            fwprov_fetch::Artifact::Archive => &self.tar,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let on_error = if self.skip_bad_entries {
            EntryErrorPolicy::Skip
        } else {
            EntryErrorPolicy::Abort
        };
        ExtractOptions::default()
            .ownership(self.ownership.into())
            .on_entry_error(on_error)
            .preserve_permissions(self.preserve_permissions)
            .preserve_mtime(self.preserve_mtime)
    }
}
