pub mod backend;
pub mod error;

use std::sync::Arc;

use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::PutPayload;
use tracing::info;

pub use backend::{LocalBackend, S3Backend, StorageBackend};
pub use error::StorageError;

/// Flat, create-or-overwrite document storage keyed by filename.
pub struct DocumentStore {
    pub backend: StorageBackend,
}

impl DocumentStore {
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Create a DocumentStore from config. Selects S3 when a bucket is
    /// configured, otherwise the local data directory.
    pub fn from_config(config: &tutor_core::Config) -> Result<Self, StorageError> {
        if config.aws.is_configured() {
            Ok(Self::new(StorageBackend::S3(S3Backend::new(&config.aws)?)))
        } else {
            std::fs::create_dir_all(&config.storage.data_dir)?;
            let local = LocalBackend::new(&config.storage.data_dir)?;
            Ok(Self::new(StorageBackend::Local(local)))
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StorageBackend::Memory(Arc::new(InMemory::new())))
    }

    /// Object path for a document key, under the backend prefix if any.
    ///
    /// The key is used verbatim (no percent-encoding). Keys the store cannot
    /// represent, i.e. empty segments (`a//b`), `.`/`..` segments or control
    /// characters, are rejected. A single leading or trailing `/` is dropped.
    pub fn object_path(&self, key: &str) -> Result<Path, StorageError> {
        let prefix = self.backend.prefix();
        let path = if prefix.is_empty() {
            Path::parse(key)?
        } else {
            Path::parse(format!("{}/{}", prefix, key))?
        };
        Ok(path)
    }

    /// Store `bytes` under `key`, replacing any existing object.
    pub async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        let size = bytes.len();
        self.backend
            .store()
            .put(&path, PutPayload::from(bytes))
            .await?;
        info!("Stored {} ({} bytes) at {}", path, size, self.backend.describe());
        Ok(())
    }

    /// Read an object back. Only used by tests and tooling.
    pub async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.object_path(key)?;
        Ok(self.backend.store().get(&path).await?.bytes().await?)
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips_bytes() {
        let store = DocumentStore::in_memory();
        let bytes = vec![0u8, 159, 146, 150, b'%', b'P', b'D', b'F'];
        store.put("lecture.pdf", Bytes::from(bytes.clone())).await.unwrap();
        assert_eq!(store.get("lecture.pdf").await.unwrap().as_ref(), bytes.as_slice());
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let store = DocumentStore::in_memory();
        store.put("notes.txt", Bytes::from_static(b"first")).await.unwrap();
        store.put("notes.txt", Bytes::from_static(b"second")).await.unwrap();
        assert_eq!(store.get("notes.txt").await.unwrap().as_ref(), b"second");
    }

    #[tokio::test]
    async fn local_backend_writes_under_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(StorageBackend::Local(LocalBackend::new(tmp.path()).unwrap()));
        store.put("a.txt", Bytes::from_static(b"hello")).await.unwrap();
        let on_disk = std::fs::read(tmp.path().join("a.txt")).unwrap();
        assert_eq!(on_disk, b"hello");
    }

    #[tokio::test]
    async fn put_fails_when_root_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file_root = tmp.path().join("not-a-dir");
        std::fs::write(&file_root, b"x").unwrap();
        let store = DocumentStore::new(StorageBackend::Local(LocalBackend::new(&file_root).unwrap()));
        let err = store.put("a.txt", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectStore(_)));
    }

    #[test]
    fn object_path_without_prefix_is_filename() {
        let store = DocumentStore::in_memory();
        assert_eq!(store.object_path("notes.txt").unwrap().as_ref(), "notes.txt");
    }

    #[test]
    fn reserved_characters_are_kept_verbatim() {
        let store = DocumentStore::in_memory();
        assert_eq!(store.object_path("notes #1.txt").unwrap().as_ref(), "notes #1.txt");
        assert_eq!(store.object_path("week 3/a%20b.txt").unwrap().as_ref(), "week 3/a%20b.txt");
    }

    #[test]
    fn unrepresentable_keys_are_rejected() {
        let store = DocumentStore::in_memory();
        for key in ["week//a.txt", "../up.txt", "a/./b.txt", "bell\x07.txt"] {
            assert!(
                matches!(store.object_path(key), Err(StorageError::InvalidKey(_))),
                "{key} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn local_backend_stores_reserved_names_as_is() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(StorageBackend::Local(LocalBackend::new(tmp.path()).unwrap()));
        store.put("notes #1.txt", Bytes::from_static(b"hash")).await.unwrap();
        assert_eq!(std::fs::read(tmp.path().join("notes #1.txt")).unwrap(), b"hash");
    }

    #[tokio::test]
    async fn put_with_double_slash_fails_without_writing() {
        let store = DocumentStore::in_memory();
        let err = store
            .put("week//a.txt", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(store.get("week/a.txt").await.is_err());
    }
}
