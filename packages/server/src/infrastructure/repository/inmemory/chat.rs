//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! メモリ上のコレクションが正であり、変更のたびに DocumentStore へ書き出します
//! （write-through）。
//!
//! ## ロックの単位
//!
//! ユーザー・ブロードキャスト履歴・DM ログ・ナッジキューはそれぞれ独立した
//! `RwLock` を持ちます。DM の追加がナッジの取得を待たせることはありません。
//! 永続化はロックを解放した後に行います。

use std::{
    collections::{BTreeMap, VecDeque},
    convert::Infallible,
    sync::Arc,
};

use async_trait::async_trait;
use tsunagi_shared::time::Clock;

use crate::domain::{
    BroadcastMessage, BroadcastPublisher, ChatRepository, CredentialHasher, DirectMessage,
    DocumentKey, DocumentStore, MAX_BROADCAST_HISTORY, MessageText, Nudge, PersistenceError,
    RepositoryError, Timestamp, User, UserSummary, UserView, Username,
};

use super::collection::{PendingWrite, PersistedCollection};

type UserTable = BTreeMap<Username, User>;
type History = VecDeque<BroadcastMessage>;
type DirectMessageLog = Vec<DirectMessage>;
type NudgeQueues = BTreeMap<Username, Vec<Nudge>>;

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    users: PersistedCollection<UserTable>,
    broadcasts: PersistedCollection<History>,
    direct_messages: PersistedCollection<DirectMessageLog>,
    nudges: PersistedCollection<NudgeQueues>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    publisher: Option<BroadcastPublisher>,
}

impl InMemoryChatRepository {
    /// `store` から 4 つのドキュメントを読み込む。存在しないものは空から始める
    pub async fn load(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PersistenceError> {
        let users = PersistedCollection::load(DocumentKey::Users, store.as_ref(), |_: &UserTable| 0).await?;
        let broadcasts =
            PersistedCollection::load(DocumentKey::BroadcastMessages, store.as_ref(), |h: &History| {
                latest(h.iter().map(|m| m.timestamp))
            })
            .await?;
        let direct_messages = PersistedCollection::load(
            DocumentKey::DirectMessages,
            store.as_ref(),
            |log: &DirectMessageLog| latest(log.iter().map(|m| m.timestamp)),
        )
        .await?;
        let nudges =
            PersistedCollection::load(DocumentKey::NudgeQueues, store.as_ref(), |q: &NudgeQueues| {
                latest(q.values().flatten().map(|n| n.timestamp))
            })
            .await?;

        // 他のツールが書いたドキュメントは上限を超えていることがある
        if broadcasts.read(|h| h.len()).await > MAX_BROADCAST_HISTORY {
            let trimmed = broadcasts
                .write(|h| {
                    trim_history(&mut h.value);
                    Ok::<_, Infallible>(())
                })
                .await;
            let pending = match trimmed {
                Ok(((), pending)) => pending,
                Err(never) => match never {},
            };
            if let Err(e) = broadcasts.persist(store.as_ref(), pending).await {
                tracing::warn!("Failed to save trimmed broadcast history: {}", e);
            }
        }

        let repository = Self {
            users,
            broadcasts,
            direct_messages,
            nudges,
            store,
            clock,
            publisher: None,
        };
        tracing::info!(
            "Chat store loaded: {} users, {} broadcast messages, {} direct messages",
            repository.users.read(|u| u.len()).await,
            repository.broadcasts.read(|h| h.len()).await,
            repository.direct_messages.read(|log| log.len()).await,
        );
        Ok(repository)
    }

    /// 追加されたブロードキャストメッセージを追加順に `publisher` へ流す
    pub fn with_broadcast_publisher(mut self, publisher: BroadcastPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    async fn append_to_history(
        &self,
        build: impl FnOnce(Timestamp) -> BroadcastMessage,
    ) -> Result<BroadcastMessage, RepositoryError> {
        let (message, pending) = self
            .broadcasts
            .write(|history| {
                let message = build(history.stamp(self.clock.as_ref()));
                history.value.push_back(message.clone());
                trim_history(&mut history.value);
                // ロックの中で流すので、配信順と履歴の順序が一致する
                self.publish(&message);
                Ok::<_, RepositoryError>(message)
            })
            .await?;
        persist(&self.broadcasts, self.store.as_ref(), pending).await?;
        Ok(message)
    }

    fn publish(&self, message: &BroadcastMessage) {
        if let Some(publisher) = &self.publisher
            && publisher.send(message.clone()).is_err()
        {
            tracing::debug!("Broadcast fan-out is gone; message not delivered live");
        }
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn register_user(
        &self,
        username: Username,
        password_hash: String,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, RepositoryError> {
        let (view, pending) = self
            .users
            .write(|users| {
                if users.value.contains_key(&username) {
                    return Err(RepositoryError::UserExists(username.as_str().to_string()));
                }
                let user = User::new(username.clone(), password_hash, status, avatar);
                let view = user.view();
                users.value.insert(username.clone(), user);
                Ok(view)
            })
            .await?;
        let saved = persist(&self.users, self.store.as_ref(), pending).await;

        let notice = MessageText::joined_notice(&username);
        let announced = self
            .append_to_history(|timestamp| BroadcastMessage::system(notice, timestamp))
            .await;

        tracing::info!("User '{}' registered", username);
        saved?;
        announced?;
        Ok(view)
    }

    async fn authenticate_user(
        &self,
        username: &Username,
        password: &str,
        checker: &dyn CredentialHasher,
    ) -> Result<UserView, RepositoryError> {
        let user = self
            .users
            .read(|users| users.get(username).cloned())
            .await
            .ok_or(RepositoryError::InvalidCredentials)?;

        // ハッシュ検証は遅いので、ロックを解放してから行う
        if checker.verify(password, &user.password_hash).await {
            Ok(user.view())
        } else {
            Err(RepositoryError::InvalidCredentials)
        }
    }

    async fn find_user(&self, username: &Username) -> Option<UserView> {
        self.users
            .read(|users| users.get(username).map(User::view))
            .await
    }

    async fn update_profile(
        &self,
        username: &Username,
        status: Option<String>,
        avatar: Option<String>,
    ) -> Result<UserView, RepositoryError> {
        let (view, pending) = self
            .users
            .write(|users| {
                let user = users
                    .value
                    .get_mut(username)
                    .ok_or_else(|| RepositoryError::UserNotFound(username.as_str().to_string()))?;
                if let Some(status) = status {
                    user.status = status;
                }
                if let Some(avatar) = avatar {
                    user.avatar = avatar;
                }
                Ok::<_, RepositoryError>(user.view())
            })
            .await?;
        persist(&self.users, self.store.as_ref(), pending).await?;
        Ok(view)
    }

    async fn list_users(&self) -> Vec<UserSummary> {
        self.users
            .read(|users| {
                users
                    .values()
                    .map(|u| UserSummary {
                        username: u.username.clone(),
                        status: u.status.clone(),
                    })
                    .collect()
            })
            .await
    }

    async fn append_broadcast(
        &self,
        sender: &Username,
        text: MessageText,
    ) -> Result<BroadcastMessage, RepositoryError> {
        self.append_to_history(|timestamp| BroadcastMessage::from_user(sender, text, timestamp))
            .await
    }

    async fn list_broadcasts(&self) -> Vec<BroadcastMessage> {
        self.broadcasts
            .read(|history| history.iter().cloned().collect())
            .await
    }

    async fn append_dm(
        &self,
        from: &Username,
        to: &Username,
        text: MessageText,
    ) -> Result<DirectMessage, RepositoryError> {
        let (message, pending) = self
            .direct_messages
            .write(|log| {
                let message = DirectMessage {
                    from: from.clone(),
                    to: to.clone(),
                    text,
                    timestamp: log.stamp(self.clock.as_ref()),
                };
                log.value.push(message.clone());
                Ok::<_, RepositoryError>(message)
            })
            .await?;
        persist(&self.direct_messages, self.store.as_ref(), pending).await?;
        Ok(message)
    }

    async fn list_dms_for(&self, username: &Username) -> Vec<DirectMessage> {
        self.direct_messages
            .read(|log| log.iter().filter(|m| m.involves(username)).cloned().collect())
            .await
    }

    async fn push_nudge(&self, to: &Username, from: &Username) -> Result<Nudge, RepositoryError> {
        let (nudge, pending) = self
            .nudges
            .write(|queues| {
                let nudge = Nudge {
                    from: from.clone(),
                    timestamp: queues.stamp(self.clock.as_ref()),
                };
                queues
                    .value
                    .entry(to.clone())
                    .or_default()
                    .push(nudge.clone());
                Ok::<_, RepositoryError>(nudge)
            })
            .await?;
        persist(&self.nudges, self.store.as_ref(), pending).await?;
        Ok(nudge)
    }

    async fn drain_nudges(&self, username: &Username) -> Result<Vec<Nudge>, RepositoryError> {
        let (drained, pending) = self
            .nudges
            .write(|queues| {
                let drained = queues.value.remove(username);
                if drained.is_none() {
                    queues.leave_unchanged();
                }
                Ok::<_, RepositoryError>(drained.unwrap_or_default())
            })
            .await?;
        // 取り出したナッジはメモリ上から既に消えているので、保存に失敗しても返す。
        // 永続化された内容は次の保存か flush() で追いつく
        if persist(&self.nudges, self.store.as_ref(), pending).await.is_err() {
            tracing::warn!(
                "Returning {} nudge(s) of '{}' before the queue was saved",
                drained.len(),
                username
            );
        }
        Ok(drained)
    }

    async fn flush(&self) -> Result<(), RepositoryError> {
        let store = self.store.as_ref();
        let results = [
            self.users.flush(store).await,
            self.broadcasts.flush(store).await,
            self.direct_messages.flush(store).await,
            self.nudges.flush(store).await,
        ];
        for result in results {
            result?;
        }
        Ok(())
    }
}

async fn persist<T>(
    collection: &PersistedCollection<T>,
    store: &dyn DocumentStore,
    pending: PendingWrite,
) -> Result<(), RepositoryError>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default + Send + Sync,
{
    collection.persist(store, pending).await.map_err(|e| {
        tracing::error!("Failed to persist chat state: {}", e);
        RepositoryError::Persistence(e)
    })
}

fn trim_history(history: &mut History) {
    while history.len() > MAX_BROADCAST_HISTORY {
        history.pop_front();
    }
}

fn latest(timestamps: impl Iterator<Item = Timestamp>) -> i64 {
    timestamps.map(|t| t.value()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockCredentialHasher, MockDocumentStore, SYSTEM_SENDER},
        infrastructure::persistence::InMemoryDocumentStore,
    };
    use std::{
        collections::HashSet,
        sync::atomic::{AtomicBool, Ordering},
    };
    use tokio::sync::mpsc;
    use tsunagi_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 同時実行下でのブロードキャスト履歴（上限 200 件、欠落・重複なし）
    // - ナッジキューの取得が一度きりであること
    // - DM の参加者ごとの取得
    // - 永続化失敗時の挙動と flush による回復
    //
    // 【なぜこのテストが必要か】
    // - Store は全ての変更を直列化する唯一の書き込み口であり、
    //   ここが壊れると lost update や重複配信が起きる
    // ========================================

    fn name(s: &str) -> Username {
        Username::new(s.to_string()).unwrap()
    }

    fn text(s: &str) -> MessageText {
        MessageText::new(s.to_string()).unwrap()
    }

    async fn create_test_repository() -> (InMemoryChatRepository, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repo = InMemoryChatRepository::load(store.clone(), Arc::new(FixedClock::new(1_000)))
            .await
            .unwrap();
        (repo, store)
    }

    async fn register(repo: &InMemoryChatRepository, username: &str) {
        repo.register_user(name(username), "hash".to_string(), None, None)
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_broadcasts_keep_latest_200_in_order() {
        // テスト項目: 同時に 250 件追加すると、最新 200 件が追加順に残る
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (repo, _store) = create_test_repository().await;
        let repo = Arc::new(repo.with_broadcast_publisher(tx));
        let alice = name("alice");

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..250 {
            let repo = repo.clone();
            let alice = alice.clone();
            handles.push(tokio::spawn(async move {
                repo.append_broadcast(&alice, text(&format!("msg-{i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果): publish 順 = 追加順。その末尾 200 件が履歴と一致
        let mut published = Vec::new();
        while let Ok(message) = rx.try_recv() {
            published.push(message);
        }
        assert_eq!(published.len(), 250);
        let distinct: HashSet<_> = published.iter().map(|m| m.text.as_str().to_string()).collect();
        assert_eq!(distinct.len(), 250);

        let history = repo.list_broadcasts().await;
        assert_eq!(history.len(), MAX_BROADCAST_HISTORY);
        assert_eq!(history, published[50..].to_vec());
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_nudge_is_drained_exactly_once() {
        // テスト項目: 送信と取得が並行しても、各ナッジはちょうど一度だけ取得される
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        let repo = Arc::new(repo);
        let bob = name("bob");
        for _ in 0..10 {
            repo.push_nudge(&bob, &name("alice")).await.unwrap();
        }

        // when (操作): 送信タスクと取得タスクを並行実行
        let pusher = {
            let repo = repo.clone();
            let bob = bob.clone();
            tokio::spawn(async move {
                for i in 0..100 {
                    repo.push_nudge(&bob, &name(&format!("user{i}"))).await.unwrap();
                }
            })
        };
        let drainer = {
            let repo = repo.clone();
            let bob = bob.clone();
            tokio::spawn(async move {
                let mut drained = Vec::new();
                for _ in 0..20 {
                    drained.extend(repo.drain_nudges(&bob).await.unwrap());
                    tokio::task::yield_now().await;
                }
                drained
            })
        };
        pusher.await.unwrap();
        let mut drained = drainer.await.unwrap();
        drained.extend(repo.drain_nudges(&bob).await.unwrap());
        let second = repo.drain_nudges(&bob).await.unwrap();

        // then (期待する結果):
        assert_eq!(drained.len(), 110);
        let senders: HashSet<_> = drained
            .iter()
            .filter(|n| n.from.as_str() != "alice")
            .map(|n| n.from.clone())
            .collect();
        assert_eq!(senders.len(), 100);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_list_dms_for_returns_only_own_conversations() {
        // テスト項目: DM の取得は自分が送信者か受信者のものだけを挿入順で返す
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        let (alice, bob, carol, dave) = (name("alice"), name("bob"), name("carol"), name("dave"));
        repo.append_dm(&bob, &alice, text("hey")).await.unwrap();
        repo.append_dm(&carol, &dave, text("unrelated")).await.unwrap();
        repo.append_dm(&alice, &bob, text("hi bob")).await.unwrap();

        // when (操作):
        let for_alice = repo.list_dms_for(&alice).await;
        let for_carol = repo.list_dms_for(&carol).await;
        let for_eve = repo.list_dms_for(&name("eve")).await;

        // then (期待する結果):
        let texts: Vec<_> = for_alice.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hey", "hi bob"]);
        assert_eq!(for_carol.len(), 1);
        assert!(for_eve.is_empty());
    }

    #[tokio::test]
    async fn test_register_twice_fails_and_announces_once() {
        // テスト項目: 同名の二重登録は UserExists になり、参加メッセージは一度だけ
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        register(&repo, "alice").await;

        // when (操作):
        let result = repo
            .register_user(name("alice"), "other".to_string(), None, None)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserExists("alice".to_string())));
        let history = repo.list_broadcasts().await;
        let joins: Vec<_> = history
            .iter()
            .filter(|m| m.text.as_str() == "alice joined the chat")
            .collect();
        assert_eq!(joins.len(), 1);
        assert!(joins[0].system);
        assert_eq!(joins[0].sender, SYSTEM_SENDER);
    }

    #[tokio::test]
    async fn test_scenario_alice_and_bob() {
        // テスト項目: 登録 → ブロードキャスト → DM の一連の流れ
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        register(&repo, "alice").await;
        register(&repo, "bob").await;

        // when (操作):
        repo.append_broadcast(&name("alice"), text("hi")).await.unwrap();
        repo.append_dm(&name("bob"), &name("alice"), text("hey"))
            .await
            .unwrap();

        // then (期待する結果):
        let history: Vec<_> = repo
            .list_broadcasts()
            .await
            .into_iter()
            .map(|m| (m.sender, m.text.into_string()))
            .collect();
        assert_eq!(
            history,
            vec![
                (SYSTEM_SENDER.to_string(), "alice joined the chat".to_string()),
                (SYSTEM_SENDER.to_string(), "bob joined the chat".to_string()),
                ("alice".to_string(), "hi".to_string()),
            ]
        );
        assert_eq!(repo.list_dms_for(&name("alice")).await.len(), 1);
        assert_eq!(repo.list_dms_for(&name("bob")).await.len(), 1);
        assert!(repo.list_dms_for(&name("carol")).await.is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_user() {
        // テスト項目: 正しいパスワードのみ認証され、未登録ユーザーと区別できない
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        register(&repo, "alice").await;
        let mut checker = MockCredentialHasher::new();
        checker
            .expect_verify()
            .returning(|password, hash| password == "secret" && hash == "hash");

        // when (操作):
        let ok = repo.authenticate_user(&name("alice"), "secret", &checker).await;
        let wrong = repo.authenticate_user(&name("alice"), "nope", &checker).await;
        let unknown = repo.authenticate_user(&name("zed"), "secret", &checker).await;

        // then (期待する結果):
        assert_eq!(ok.unwrap().username, name("alice"));
        assert_eq!(wrong, Err(RepositoryError::InvalidCredentials));
        assert_eq!(unknown, Err(RepositoryError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_update_profile() {
        // テスト項目: status / avatar を更新でき、未登録ユーザーは NotFound
        // given (前提条件):
        let (repo, _store) = create_test_repository().await;
        register(&repo, "alice").await;

        // when (操作):
        let updated = repo
            .update_profile(&name("alice"), Some("Away".to_string()), None)
            .await
            .unwrap();
        let missing = repo.update_profile(&name("zed"), None, None).await;

        // then (期待する結果):
        assert_eq!(updated.status, "Away");
        assert_eq!(updated.avatar, "");
        assert_eq!(missing, Err(RepositoryError::UserNotFound("zed".to_string())));
        let users = repo.list_users().await;
        assert_eq!(users[0].status, "Away");
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        // テスト項目: 保存したドキュメントを新しいインスタンスが読み込める
        // given (前提条件):
        let (repo, store) = create_test_repository().await;
        register(&repo, "alice").await;
        repo.append_dm(&name("alice"), &name("bob"), text("yo")).await.unwrap();
        repo.push_nudge(&name("bob"), &name("alice")).await.unwrap();

        // when (操作):
        let reloaded = InMemoryChatRepository::load(store, Arc::new(FixedClock::new(0)))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(reloaded.find_user(&name("alice")).await.is_some());
        assert_eq!(reloaded.list_broadcasts().await.len(), 1);
        assert_eq!(reloaded.list_dms_for(&name("bob")).await.len(), 1);
        assert_eq!(reloaded.drain_nudges(&name("bob")).await.unwrap().len(), 1);

        // 読み込み後の時刻は既存データより前に戻らない
        let later = reloaded
            .append_dm(&name("bob"), &name("alice"), text("back"))
            .await
            .unwrap();
        assert_eq!(later.timestamp, Timestamp::new(1_000));
    }

    #[tokio::test]
    async fn test_oversized_history_is_trimmed_on_load() {
        // テスト項目: 上限を超える履歴ドキュメントは読み込み時に切り詰められる
        // given (前提条件):
        let store = Arc::new(InMemoryDocumentStore::new());
        let messages: Vec<_> = (0..205)
            .map(|i| BroadcastMessage::from_user(&name("alice"), text(&format!("m{i}")), Timestamp::new(i)))
            .collect();
        store
            .save(DocumentKey::BroadcastMessages, serde_json::to_value(&messages).unwrap())
            .await
            .unwrap();

        // when (操作):
        let repo = InMemoryChatRepository::load(store.clone(), Arc::new(FixedClock::new(0)))
            .await
            .unwrap();

        // then (期待する結果): メモリ上もドキュメントも 200 件に揃う
        let history = repo.list_broadcasts().await;
        assert_eq!(history.len(), MAX_BROADCAST_HISTORY);
        assert_eq!(history[0].text.as_str(), "m5");
        let saved = store.load(DocumentKey::BroadcastMessages).await.unwrap().unwrap();
        assert_eq!(saved.as_array().unwrap().len(), MAX_BROADCAST_HISTORY);
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_state_and_flush_recovers() {
        // テスト項目: 保存失敗時もメモリ上の状態は保持され、flush で永続化できる
        // given (前提条件): save が失敗する DocumentStore
        let healthy = Arc::new(AtomicBool::new(false));
        let (store, saved) = switchable_store(healthy.clone());
        let repo = InMemoryChatRepository::load(Arc::new(store), Arc::new(FixedClock::new(0)))
            .await
            .unwrap();

        // when (操作):
        let result = repo.append_dm(&name("alice"), &name("bob"), text("hello")).await;
        healthy.store(true, Ordering::SeqCst);
        let flushed = repo.flush().await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Persistence(_))));
        assert_eq!(repo.list_dms_for(&name("bob")).await.len(), 1);
        assert!(flushed.is_ok());
        assert_eq!(*saved.lock().unwrap(), vec![DocumentKey::DirectMessages]);
    }

    /// save の成否を切り替えられる DocumentStore と、保存されたキーの記録
    fn switchable_store(healthy: Arc<AtomicBool>) -> (MockDocumentStore, Arc<std::sync::Mutex<Vec<DocumentKey>>>) {
        let saved = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut store = MockDocumentStore::new();
        store.expect_load().returning(|_| Ok(None));
        {
            let saved = saved.clone();
            store.expect_save().returning(move |key, _| {
                if healthy.load(Ordering::SeqCst) {
                    saved.lock().unwrap().push(key);
                    Ok(())
                } else {
                    Err(PersistenceError::Io {
                        document: key.to_string(),
                        message: "disk full".to_string(),
                    })
                }
            });
        }
        (store, saved)
    }

    #[tokio::test]
    async fn test_drain_returns_nudges_even_if_save_fails() {
        // テスト項目: 取得時の保存に失敗してもナッジは失われず、ちょうど一度だけ返る
        // given (前提条件): ナッジが 1 件積まれた後、save が失敗するようになる
        let healthy = Arc::new(AtomicBool::new(true));
        let (store, saved) = switchable_store(healthy.clone());
        let repo = InMemoryChatRepository::load(Arc::new(store), Arc::new(FixedClock::new(0)))
            .await
            .unwrap();
        let nudge = repo.push_nudge(&name("bob"), &name("alice")).await.unwrap();
        healthy.store(false, Ordering::SeqCst);

        // when (操作):
        let first = repo.drain_nudges(&name("bob")).await;
        healthy.store(true, Ordering::SeqCst);
        let second = repo.drain_nudges(&name("bob")).await.unwrap();
        let flushed = repo.flush().await;

        // then (期待する結果):
        assert_eq!(first, Ok(vec![nudge]));
        assert!(second.is_empty());
        assert!(flushed.is_ok());
        assert_eq!(
            *saved.lock().unwrap(),
            vec![DocumentKey::NudgeQueues, DocumentKey::NudgeQueues]
        );
    }

    #[tokio::test]
    async fn test_draining_empty_queue_writes_nothing() {
        // テスト項目: 空のキューを取得しても nudge_queue.json は書き直されない
        // given (前提条件):
        let healthy = Arc::new(AtomicBool::new(true));
        let (store, saved) = switchable_store(healthy);
        let repo = InMemoryChatRepository::load(Arc::new(store), Arc::new(FixedClock::new(0)))
            .await
            .unwrap();

        // when (操作):
        let drained = repo.drain_nudges(&name("bob")).await.unwrap();
        repo.flush().await.unwrap();

        // then (期待する結果):
        assert!(drained.is_empty());
        assert!(saved.lock().unwrap().is_empty());
    }
}
