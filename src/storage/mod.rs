// src/storage/mod.rs
//! Durable copies of the finished reports.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::{StorageTarget, STORAGE_PREFIX};

/// Somewhere to put report files, addressed by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the file at `path` under `key`, returning where it went.
    async fn put_file(&self, key: &str, path: &Path) -> Result<String>;
}

/// S3 bucket, authenticated through the standard AWS credential chain.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let cfg = aws_config::load_from_env().await;
        Self {
            client: Client::new(&cfg),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_file(&self, key: &str, path: &Path) -> Result<String> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("uploading s3://{}/{}", self.bucket, key))?;
        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}

/// Mirrors keys into a local directory tree.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for DirStore {
    async fn put_file(&self, key: &str, path: &Path) -> Result<String> {
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::copy(path, &dest)
            .await
            .with_context(|| format!("copying {} to {}", path.display(), dest.display()))?;
        Ok(dest.display().to_string())
    }
}

/// Build the store a target names, or `None` when uploads are off.
pub async fn open(target: &StorageTarget) -> Option<Box<dyn ObjectStore>> {
    match target {
        StorageTarget::None => None,
        StorageTarget::S3 { bucket } => Some(Box::new(S3Store::from_env(bucket.clone()).await)),
        StorageTarget::Dir(root) => Some(Box::new(DirStore::new(root.clone()))),
    }
}

/// Bucket key for a report file, e.g. `roto-ranks/data/roto_ranks.csv`.
pub fn key_for(relative: &str) -> String {
    format!("{}{}", STORAGE_PREFIX, relative)
}

/// Upload each `(key, path)` pair in order, stopping at the first failure.
pub async fn upload_all(store: &dyn ObjectStore, files: &[(String, PathBuf)]) -> Result<Vec<String>> {
    let mut placed = Vec::with_capacity(files.len());
    for (key, path) in files {
        let location = store.put_file(key, path).await?;
        info!(%location, "uploaded");
        placed.push(location);
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_key_for_adds_prefix() {
        assert_eq!(key_for("data/roto_ranks.csv"), "roto-ranks/data/roto_ranks.csv");
    }

    #[tokio::test]
    async fn test_dir_store_mirrors_keys() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let file = src.path().join("roto_ranks.csv");
        std::fs::write(&file, "team,scores\nAces,25.0\n").unwrap();

        let store = open(&StorageTarget::Dir(dst.path().to_path_buf()))
            .await
            .unwrap();
        let placed = upload_all(
            store.as_ref(),
            &[(key_for("data/roto_ranks.csv"), file.clone())],
        )
        .await
        .unwrap();

        let copied = dst.path().join("roto-ranks/data/roto_ranks.csv");
        assert_eq!(placed, vec![copied.display().to_string()]);
        assert_eq!(
            std::fs::read_to_string(copied).unwrap(),
            "team,scores\nAces,25.0\n"
        );
    }

    #[tokio::test]
    async fn test_missing_source_fails_upload() {
        let dst = tempdir().unwrap();
        let store = DirStore::new(dst.path());
        let err = upload_all(
            &store,
            &[(key_for("index.html"), dst.path().join("absent.html"))],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("absent.html"));
    }

    #[tokio::test]
    async fn test_no_target_means_no_store() {
        assert!(open(&StorageTarget::None).await.is_none());
    }
}
