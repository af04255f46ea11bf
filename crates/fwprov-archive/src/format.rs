use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Open a gzip tar held in memory.
pub fn open(bytes: &[u8]) -> Result<tar::Archive<GzDecoder<&[u8]>>> {
    if !is_gzip(bytes) {
        return Err(Error::NotGzip);
    }
    Ok(tar::Archive::new(GzDecoder::new(bytes)))
}

/// Entries iterator with io errors mapped to [`Error::Corrupted`].
pub fn entries<'a, R: Read + 'a>(
    archive: &'a mut tar::Archive<R>,
) -> Result<impl Iterator<Item = Result<tar::Entry<'a, R>>> + 'a> {
    let entries = archive.entries().map_err(Error::Corrupted)?;
    Ok(entries.map(|entry| entry.map_err(Error::Corrupted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_gzip_magic() {
        assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
        assert!(!is_gzip(b"ustar"));
        assert!(!is_gzip(&[]));
    }

    #[test]
    fn open_rejects_plain_bytes() {
        assert!(matches!(open(b"not a tarball"), Err(Error::NotGzip)));
    }
}
