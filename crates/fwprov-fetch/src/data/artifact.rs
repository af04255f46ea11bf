use std::fmt;

use bytes::Bytes;

use super::source::Source;

/// One of the three files that make up a firmware release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Boot,
    Image,
    Archive,
}

impl Artifact {
    /// Resolution order. Error reporting depends on it, so keep it stable.
    pub const ALL: [Artifact; 3] = [Artifact::Boot, Artifact::Image, Artifact::Archive];

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Boot => "BOOT.BIN",
            Artifact::Image => "image.ub",
            Artifact::Archive => "SD_p2.tar.gz",
        }
    }

    /// Whether the hardware variant suffix is appended to the remote file name.
    pub fn takes_variant(self) -> bool {
        !matches!(self, Artifact::Archive)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Boot => write!(f, "boot image"),
            Artifact::Image => write!(f, "kernel image"),
            Artifact::Archive => write!(f, "archive"),
        }
    }
}

/// A resolved artifact held in memory until it is written or expanded.
#[derive(Debug, Clone)]
pub struct Payload {
    pub artifact: Artifact,
    /// Where the bytes actually came from: the full download URL or the file read.
    pub origin: Source,
    pub bytes: Bytes,
}

impl Payload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
