//! uxstudy-storage: CSV files as the record store.
//!
//! Each dataset lives in its own delimited file under one storage directory.
//! A dataset is created with its header already in place; every append then
//! adds one line with a single write on an append-mode handle.

pub mod codec;

use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use uxstudy_core::model::{Dataset, Row};
use uxstudy_core::{RecordStore, StoreError};

/// Record store backed by one CSV file per dataset.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "opened csv store");
        Ok(Self { dir })
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `dataset`.
    pub fn path(&self, dataset: Dataset) -> PathBuf {
        self.dir.join(dataset.file_name())
    }

    fn write_once(path: &Path, file: &mut File, bytes: &[u8]) -> Result<(), StoreError> {
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| StoreError::io(path, e))
    }

    /// Make sure the dataset file exists with a header.
    ///
    /// The header is staged in a temporary file and linked into place only if
    /// nothing is there yet, so a new dataset never becomes visible empty and
    /// an existing one is never replaced.
    fn create_with_header(
        &self,
        dataset: Dataset,
        path: &Path,
        row: &Row,
    ) -> Result<(), StoreError> {
        if path.exists() {
            return Ok(());
        }

        let header = codec::encode_header(row).map_err(|e| StoreError::io(path, e))?;
        let mut staged =
            NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        staged
            .write_all(&header)
            .and_then(|_| staged.flush())
            .map_err(|e| StoreError::io(&self.dir, e))?;

        match staged.persist_noclobber(path) {
            Ok(_) => {
                tracing::debug!(%dataset, path = %path.display(), "created dataset");
                Ok(())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(StoreError::io(path, e.error)),
        }
    }
}

impl RecordStore for CsvStore {
    fn append(&self, dataset: Dataset, row: &Row) -> Result<(), StoreError> {
        let path = self.path(dataset);
        self.create_with_header(dataset, &path, row)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        // Only a file emptied or created outside this store lacks a header.
        let needs_header = file
            .metadata()
            .map_err(|e| StoreError::io(&path, e))?
            .len()
            == 0;
        let bytes = codec::encode_row(row, needs_header).map_err(|e| StoreError::io(&path, e))?;
        Self::write_once(&path, &mut file, &bytes)?;
        tracing::debug!(%dataset, "appended row");
        Ok(())
    }

    fn load(&self, dataset: Dataset) -> Result<Vec<Row>, StoreError> {
        let path = self.path(dataset);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let rows = codec::decode_rows(dataset, &path, BufReader::new(file))?;
        tracing::debug!(%dataset, rows = rows.len(), "loaded dataset");
        Ok(rows)
    }
}
