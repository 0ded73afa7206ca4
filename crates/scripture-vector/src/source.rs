use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use scripture_core::error::{Error, Result};
use scripture_core::traits::ShardSource;

use crate::shard::MANIFEST_FILE;

/// Shards laid out as `<root>/<shard>/manifest.json` plus the files the
/// manifest names.
#[derive(Debug, Clone)]
pub struct FsShardSource {
    root: PathBuf,
}

impl FsShardSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, shard: &str, file: &str) -> Result<PathBuf> {
        for part in [shard, file] {
            let plain = Path::new(part).components().all(|c| matches!(c, Component::Normal(_)));
            if part.is_empty() || !plain {
                return Err(Error::fetch(format!("{shard}/{file}"), "path escapes the shard directory"));
            }
        }
        Ok(self.root.join(shard).join(file))
    }

    /// Names of the sub-directories of `root` that contain a manifest, sorted.
    pub fn discover(&self) -> Vec<String> {
        let mut shards: Vec<String> = walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir() && e.path().join(MANIFEST_FILE).is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        shards.sort();
        shards
    }
}

#[async_trait]
impl ShardSource for FsShardSource {
    async fn fetch_text(&self, shard: &str, file: &str) -> Result<String> {
        let bytes = self.fetch_bytes(shard, file).await?;
        String::from_utf8(bytes).map_err(|e| Error::parse(format!("{shard}/{file}"), e))
    }

    async fn fetch_bytes(&self, shard: &str, file: &str) -> Result<Vec<u8>> {
        let path = self.file_path(shard, file)?;
        debug!(path = %path.display(), "reading shard file");
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::fetch(path.display().to_string(), e))
    }
}

/// Shard files held in memory, keyed by `(shard, file)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryShardSource {
    files: HashMap<(String, String), Vec<u8>>,
}

impl MemoryShardSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, shard: &str, file: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert((shard.to_string(), file.to_string()), bytes.into());
    }

    pub fn with_file(mut self, shard: &str, file: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(shard, file, bytes);
        self
    }
}

#[async_trait]
impl ShardSource for MemoryShardSource {
    async fn fetch_text(&self, shard: &str, file: &str) -> Result<String> {
        let bytes = self.fetch_bytes(shard, file).await?;
        String::from_utf8(bytes).map_err(|e| Error::parse(format!("{shard}/{file}"), e))
    }

    async fn fetch_bytes(&self, shard: &str, file: &str) -> Result<Vec<u8>> {
        self.files
            .get(&(shard.to_string(), file.to_string()))
            .cloned()
            .ok_or_else(|| Error::fetch(format!("{shard}/{file}"), "not found"))
    }
}
