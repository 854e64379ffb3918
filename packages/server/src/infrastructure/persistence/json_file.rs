//! JSON ファイルを使った DocumentStore 実装
//!
//! ドキュメントごとに 1 ファイル（`users.json`, `messages.json`,
//! `dm_messages.json`, `nudge_queue.json`）をデータディレクトリに保存します。
//!
//! 保存は一時ファイルへ書き込んでから `rename` で置き換えるため、
//! 書き込み途中でプロセスが落ちても既存のファイルが壊れることはありません。

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DocumentKey, DocumentStore, PersistenceError};

pub struct JsonFileDocumentStore {
    dir: PathBuf,
}

impl JsonFileDocumentStore {
    /// `dir` を開く。存在しなければ作成する
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PersistenceError::Io {
                document: dir.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::info!("Using data directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, key: DocumentKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

fn io_error(key: DocumentKey, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        document: key.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn load(&self, key: DocumentKey) -> Result<Option<serde_json::Value>, PersistenceError> {
        let bytes = match tokio::fs::read(self.path_of(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(key, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| PersistenceError::Serialization {
                document: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn save(
        &self,
        key: DocumentKey,
        document: serde_json::Value,
    ) -> Result<(), PersistenceError> {
        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|e| PersistenceError::Serialization {
                document: key.to_string(),
                message: e.to_string(),
            })?;

        let target = self.path_of(key);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", key.file_name(), Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key, e));
        }
        tracing::debug!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(())
    }
}
