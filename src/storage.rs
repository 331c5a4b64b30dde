use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use uuid::Uuid;

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Persist an uploaded body and return the generated stored filename.
    async fn save(&self, body: Bytes, original_name: &str) -> anyhow::Result<String>;
}

/// Stores uploads as uuid-named files beneath a local directory.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn save(&self, body: Bytes, original_name: &str) -> anyhow::Result<String> {
        let stored_name = match Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&stored_name), &body)
            .await
            .with_context(|| format!("write upload {stored_name}"))?;
        Ok(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_file_and_keeps_extension() {
        let dir = std::env::temp_dir().join(format!("accountd-storage-{}", Uuid::new_v4()));
        let storage = LocalStorage::new(&dir).await.expect("create storage");

        let name = storage
            .save(Bytes::from_static(b"\x89PNG fake"), "avatar.png")
            .await
            .expect("save upload");

        assert!(name.ends_with(".png"));
        let written = tokio::fs::read(dir.join(&name)).await.expect("read back");
        assert_eq!(written, b"\x89PNG fake");
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn save_handles_names_without_extension() {
        let dir = std::env::temp_dir().join(format!("accountd-storage-{}", Uuid::new_v4()));
        let storage = LocalStorage::new(&dir).await.expect("create storage");

        let name = storage
            .save(Bytes::from_static(b"data"), "upload")
            .await
            .expect("save upload");

        assert!(!name.contains('.'));
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
