//! 永続化されるコレクション 1 つ分
//!
//! コレクションごとに独立したロックを持つため、別のコレクションへの変更は
//! 互いに待ちません。変更は書き込みロックの中でリビジョンを進めるだけで、
//! シリアライズと保存はロックを解放した後、読み取りロックの下で行います。
//! 同じドキュメントへの保存は直列化され、既に保存済みのリビジョンより古い
//! 保存要求は捨てられるので、永続化された内容が巻き戻ることはありません。

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, RwLock};
use tsunagi_shared::time::Clock;

use crate::domain::{DocumentKey, DocumentStore, PersistenceError, Timestamp};

pub(super) struct Versioned<T> {
    pub value: T,
    revision: u64,
    high_water: i64,
    unchanged: bool,
}

impl<T> Versioned<T> {
    /// このコレクション内で減少しないタイムスタンプを採番する（時計が巻き戻っても）
    pub fn stamp(&mut self, clock: &dyn Clock) -> Timestamp {
        let now = clock.now_millis().max(self.high_water);
        self.high_water = now;
        Timestamp::new(now)
    }

    /// 値を変更しなかったことを示す（リビジョンを進めず、保存もしない）
    pub fn leave_unchanged(&mut self) {
        self.unchanged = true;
    }
}

/// 保存待ちのリビジョン。`None` は保存不要
pub(super) struct PendingWrite {
    revision: Option<u64>,
}

pub(super) struct PersistedCollection<T> {
    key: DocumentKey,
    state: RwLock<Versioned<T>>,
    persisted_revision: Mutex<u64>,
}

impl<T> PersistedCollection<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
{
    /// ドキュメントを読み込む。存在しなければ `T::default()` から始める
    ///
    /// `latest_timestamp` は読み込んだデータの最新時刻で、採番の起点になる
    pub async fn load(
        key: DocumentKey,
        store: &dyn DocumentStore,
        latest_timestamp: impl FnOnce(&T) -> i64,
    ) -> Result<Self, PersistenceError> {
        let value = match store.load(key).await? {
            Some(document) => {
                serde_json::from_value(document).map_err(|e| PersistenceError::Serialization {
                    document: key.to_string(),
                    message: e.to_string(),
                })?
            }
            None => T::default(),
        };
        let high_water = latest_timestamp(&value);
        Ok(Self {
            key,
            state: RwLock::new(Versioned {
                value,
                revision: 0,
                high_water,
                unchanged: false,
            }),
            persisted_revision: Mutex::new(0),
        })
    }

    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.state.read().await;
        f(&guard.value)
    }

    /// 書き込みロックの中で `f` を実行する
    ///
    /// `f` が `Err` を返す場合は値を変更していないこと。その場合リビジョンは進まない
    pub async fn write<R, E>(
        &self,
        f: impl FnOnce(&mut Versioned<T>) -> Result<R, E>,
    ) -> Result<(R, PendingWrite), E> {
        let mut guard = self.state.write().await;
        guard.unchanged = false;
        let out = f(&mut *guard)?;
        if guard.unchanged {
            return Ok((out, PendingWrite { revision: None }));
        }
        guard.revision += 1;
        Ok((
            out,
            PendingWrite {
                revision: Some(guard.revision),
            },
        ))
    }

    /// `pending` のリビジョンが未保存なら、現在の値を保存する
    ///
    /// 保存するのは呼び出し時点の最新の値なので、並行した複数の変更は
    /// 1 回の保存にまとめられる
    pub async fn persist(
        &self,
        store: &dyn DocumentStore,
        pending: PendingWrite,
    ) -> Result<(), PersistenceError> {
        let Some(revision) = pending.revision else {
            return Ok(());
        };
        let mut persisted = self.persisted_revision.lock().await;
        if *persisted >= revision {
            tracing::trace!(
                "Skipping r{} of '{}' (r{} already saved)",
                revision,
                self.key,
                *persisted
            );
            return Ok(());
        }
        let (current, document) = {
            let guard = self.state.read().await;
            (guard.revision, self.serialize(&guard.value))
        };
        store.save(self.key, document?).await?;
        *persisted = current;
        Ok(())
    }

    /// 永続化された内容が遅れていれば現在の値を保存する
    pub async fn flush(&self, store: &dyn DocumentStore) -> Result<(), PersistenceError> {
        let revision = self.state.read().await.revision;
        self.persist(
            store,
            PendingWrite {
                revision: Some(revision),
            },
        )
        .await
    }

    fn serialize(&self, value: &T) -> Result<serde_json::Value, PersistenceError> {
        serde_json::to_value(value).map_err(|e| PersistenceError::Serialization {
            document: self.key.to_string(),
            message: e.to_string(),
        })
    }
}
