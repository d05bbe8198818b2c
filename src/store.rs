//! Content-addressed page persistence.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// A fetched page's body plus the exact URL that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The percent-encoded URL that was fetched.
    pub url: String,
    /// Raw fetched body, verbatim.
    pub body: String,
}

impl PageRecord {
    /// Builds a record from a fetched URL and its body.
    pub fn new(url: &Url, body: String) -> Self {
        Self {
            url: url.to_string(),
            body,
        }
    }

    /// Deterministic filename for this record: the lowercase hex SHA-256 of
    /// the exact URL string, suffixed `.txt`.
    ///
    /// Re-fetching the same URL overwrites the same file.
    pub fn file_name(&self) -> String {
        let digest = Sha256::digest(self.url.as_bytes());
        format!("{}.txt", hex::encode(digest))
    }
}

/// Writes one file per fetched page into a flat directory.
///
/// File layout is the contract the downstream extraction step re-parses:
/// the fetched URL on the first line, then the body verbatim.
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    /// Opens the store, creating the directory when absent.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Persists a page record, returning the path written.
    pub fn save(&self, record: &PageRecord) -> io::Result<PathBuf> {
        let path = self.dir.join(record.file_name());
        fs::write(&path, format!("{}\n{}", record.url, record.body))?;
        Ok(path)
    }
}
