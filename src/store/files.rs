use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::http::mime;
use crate::store::error::{Operation, StoreError};
use crate::store::path;

/// Contents of a stored resource.
#[derive(Debug)]
pub struct StoredFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// Flat namespace of named byte blobs under one root directory.
///
/// Every operation except [`FileStore::list`] goes through
/// [`path::resolve`] first. There is no locking: concurrent writers to the
/// same name race at the filesystem's discretion.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Anchors the store at `root`, made absolute and cleaned.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::path::absolute(root.as_ref())?;
        Ok(Self {
            root: path::clean(&root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, raw_name: &str) -> Result<PathBuf, StoreError> {
        path::resolve(&self.root, raw_name)
    }

    /// Names of the root's immediate entries, sorted.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io(Operation::List, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(Operation::List, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub async fn read(&self, raw_name: &str) -> Result<StoredFile, StoreError> {
        let path = self.resolve(raw_name)?;

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StoreError::NotFound(raw_name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(raw_name.to_string()));
            }
            Err(e) => return Err(StoreError::io(Operation::Read, e)),
        }

        let data = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(raw_name.to_string()),
            _ => StoreError::io(Operation::Read, e),
        })?;

        Ok(StoredFile {
            content_type: mime::content_type_for(&path),
            path,
            data,
        })
    }

    /// Creates or truncates the resource and writes `data` verbatim.
    pub async fn write(&self, raw_name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.resolve(raw_name)?;
        fs::write(&path, data)
            .await
            .map_err(|e| StoreError::io(Operation::Write, e))?;
        Ok(path)
    }

    pub async fn delete(&self, raw_name: &str) -> Result<(), StoreError> {
        let path = self.resolve(raw_name)?;
        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(raw_name.to_string()),
            _ => StoreError::io(Operation::Delete, e),
        })
    }
}
