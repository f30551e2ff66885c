// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;

/// Destination for finished posts
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, key: &str, content: &str) -> std::io::Result<()>;
}

/// Writes `<dir>/<key>.txt`, creating the directory on demand
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", key))
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn write(&self, key: &str, content: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        tokio::fs::write(&path, content).await?;
        log::info!("Saved post to {}", path.display());
        Ok(())
    }
}

/// File-safe key for a topic: spaces and path separators become underscores
pub fn output_key(topic: &str) -> String {
    topic
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
