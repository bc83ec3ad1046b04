use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::base_storage::BaseStorage;
use data_error::{Result, ShelfError};

/*
Note on `FileStorage` durability:

The document is rewritten as a whole on every write: the file is truncated
and the pretty-printed JSON is streamed into it. There is no temporary file
and no rename, so a crash mid-write can leave a truncated document behind.
Reading such a file is an error; it is never replaced by an empty document.
*/

/// Represents a single JSON document persisted to disk.
pub struct FileStorage<T> {
    label: String,
    path: PathBuf,
    modified: Option<SystemTime>,
    _marker: PhantomData<T>,
}

impl<T> FileStorage<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a new file storage with a diagnostic label and file path
    pub fn new(label: impl Into<String>, path: &Path) -> Self {
        Self {
            label: label.into(),
            path: PathBuf::from(path),
            modified: None,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, message: impl ToString) -> ShelfError {
        ShelfError::Storage(self.label.clone(), message.to_string())
    }
}

impl<T> BaseStorage<T> for FileStorage<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Read the document from the storage file.
    ///
    /// A missing file is created with the default document first.
    fn read_fs(&mut self) -> Result<T> {
        if !self.path.exists() {
            log::info!(
                "storage/{}: {} does not exist, creating it",
                self.label,
                self.path.display()
            );
            let empty = T::default();
            self.write_fs(&empty)?;
            return Ok(empty);
        }

        let file = File::open(&self.path)?;
        let data: T = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| self.storage_error(err))?;
        self.modified = Some(fs::metadata(&self.path)?.modified()?);

        log::debug!(
            "storage/{}: loaded {}",
            self.label,
            self.path.display()
        );
        Ok(data)
    }

    /// Truncate the storage file and write the document into it
    fn write_fs(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|err| self.storage_error(err))?;
        writer.flush()?;

        self.modified = Some(fs::metadata(&self.path)?.modified()?);
        log::debug!(
            "storage/{}: written to {}",
            self.label,
            self.path.display()
        );
        Ok(())
    }

    /// Compare the modification time of the storage file
    /// with the one observed on the last read or write.
    fn needs_syncing(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(metadata.modified()?) != self.modified),
            Err(e) => Err(self.storage_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;
    use tempdir::TempDir;

    use crate::{base_storage::BaseStorage, file_storage::FileStorage};
    use data_error::ShelfError;

    type Document = BTreeMap<String, Vec<u32>>;

    #[test]
    fn test_file_storage_write_read() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("test_storage.json");

        let mut storage: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);

        let mut document = Document::new();
        document.insert("key1".to_string(), vec![1, 2]);
        document.insert("key2".to_string(), vec![]);
        storage.write_fs(&document).unwrap();

        let mut mirror: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);
        assert_eq!(mirror.read_fs().unwrap(), document);
    }

    #[test]
    fn test_file_storage_creates_missing_file() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("nested/dir/cache.json");

        let mut storage: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);
        assert!(storage.read_fs().unwrap().is_empty());
        assert!(storage_path.exists());
        assert!(!storage.needs_syncing().unwrap());
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("cache.json");
        fs::write(&storage_path, "{\"key1\": [1, ").unwrap();

        let mut storage: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);
        match storage.read_fs() {
            Err(ShelfError::Storage(label, _)) => {
                assert_eq!(label, "TestStorage")
            }
            other => panic!("Expected a storage error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_storage_truncates_on_write() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("cache.json");

        let mut storage: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);
        let mut document = Document::new();
        document.insert("a".repeat(512), vec![7; 64]);
        storage.write_fs(&document).unwrap();
        storage.write_fs(&Document::new()).unwrap();

        assert_eq!(storage.read_fs().unwrap(), Document::new());
    }

    #[test]
    fn test_file_storage_detects_foreign_writes() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("cache.json");

        let mut storage: FileStorage<Document> =
            FileStorage::new("TestStorage", &storage_path);
        storage.write_fs(&Document::new()).unwrap();
        assert!(!storage.needs_syncing().unwrap());

        // Wait for the mtime to tick before the other writer touches the file
        std::thread::sleep(std::time::Duration::from_secs(1));
        let mut other: FileStorage<Document> =
            FileStorage::new("OtherStorage", &storage_path);
        let mut document = Document::new();
        document.insert("key1".to_string(), vec![1]);
        other.write_fs(&document).unwrap();

        assert!(storage.needs_syncing().unwrap());
        assert!(!other.needs_syncing().unwrap());

        assert_eq!(storage.read_fs().unwrap(), document);
        assert!(!storage.needs_syncing().unwrap());

        fs::remove_file(&storage_path).unwrap();
        assert!(storage.needs_syncing().is_err());
    }
}
