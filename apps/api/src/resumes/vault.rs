use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::ResumeFile;
use crate::storage::StoreError;

/// Prefix of resume references stored in `resumeUrl` fields.
pub const REFERENCE_PREFIX: &str = "resume://sha256/";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobMeta {
    file_name: String,
    content_type: String,
}

/// Content-addressed resume storage: `<dir>/<sha256>.bin` plus a `.json`
/// sidecar with the original file name and content type.
#[derive(Debug, Clone)]
pub struct ResumeVault {
    dir: PathBuf,
}

impl ResumeVault {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Stores the file (once per distinct content) and returns its reference.
    pub fn store(&self, file: &ResumeFile) -> Result<String, StoreError> {
        let digest = hex::encode(Sha256::digest(&file.bytes));
        let blob_path = self.dir.join(format!("{digest}.bin"));

        if blob_path.exists() {
            debug!("Resume {digest} already stored");
        } else {
            self.write_atomic(&blob_path, &file.bytes)?;
            info!("Stored resume {digest} ({} bytes)", file.bytes.len());
        }

        let meta = BlobMeta {
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
        };
        self.write_atomic(
            &self.dir.join(format!("{digest}.json")),
            &serde_json::to_vec(&meta)?,
        )?;

        Ok(format!("{REFERENCE_PREFIX}{digest}"))
    }

    /// Resolves a reference. Anything that is not a vault reference (such as a
    /// stale `blob:` handle) or whose content is gone resolves to `None`.
    pub fn load(&self, reference: &str) -> Result<Option<ResumeFile>, StoreError> {
        let Some(digest) = parse_reference(reference) else {
            return Ok(None);
        };

        let bytes = match fs::read(self.dir.join(format!("{digest}.bin"))) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let meta = match fs::read(self.dir.join(format!("{digest}.json"))) {
            Ok(raw) => serde_json::from_slice(&raw).ok(),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        }
        .unwrap_or_else(|| BlobMeta {
            file_name: "resume.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        });

        Ok(Some(ResumeFile {
            file_name: meta.file_name,
            content_type: meta.content_type,
            bytes,
        }))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Extracts the hex digest from a well-formed reference.
fn parse_reference(reference: &str) -> Option<&str> {
    let digest = reference.strip_prefix(REFERENCE_PREFIX)?;
    (digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit())).then_some(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(content: &'static [u8]) -> ResumeFile {
        ResumeFile {
            file_name: "cv.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: Bytes::from_static(content),
        }
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let vault = ResumeVault::open(dir.path()).unwrap();

        let reference = vault.store(&resume(b"%PDF-1.4 hello")).unwrap();
        assert!(reference.starts_with(REFERENCE_PREFIX));

        let loaded = vault.load(&reference).unwrap().unwrap();
        assert_eq!(loaded, resume(b"%PDF-1.4 hello"));
    }

    #[test]
    fn test_same_content_same_reference() {
        let dir = tempfile::tempdir().unwrap();
        let vault = ResumeVault::open(dir.path()).unwrap();
        let a = vault.store(&resume(b"same")).unwrap();
        let b = vault.store(&resume(b"same")).unwrap();
        let c = vault.store(&resume(b"different")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reference_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let reference = ResumeVault::open(dir.path())
            .unwrap()
            .store(&resume(b"persisted"))
            .unwrap();
        let reopened = ResumeVault::open(dir.path()).unwrap();
        assert!(reopened.load(&reference).unwrap().is_some());
    }

    #[test]
    fn test_foreign_or_malformed_references_resolve_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let vault = ResumeVault::open(dir.path()).unwrap();
        assert!(vault.load("blob:http://localhost:5173/1234").unwrap().is_none());
        assert!(vault.load("resume://sha256/../../etc/passwd").unwrap().is_none());
        let unknown = format!("{REFERENCE_PREFIX}{}", "0".repeat(64));
        assert!(vault.load(&unknown).unwrap().is_none());
    }
}
