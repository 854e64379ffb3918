//! UseCase: ブロードキャストの配信（fan-out）
//!
//! Repository が追加順に発行するブロードキャストメッセージを受け取り、
//! 接続中の全クライアントへ `new_message` イベントとして配信します。
//! 1 つのタスクだけがストリームを読むので、どの接続にも追加順に届きます。

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{BroadcastMessage, MessagePusher},
    infrastructure::dto::websocket::ServerEvent,
};

pub struct BroadcastFanout {
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastFanout {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 全ての発行元が破棄されるまで配信を続ける
    pub fn spawn(self, mut receiver: mpsc::UnboundedReceiver<BroadcastMessage>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                self.deliver(message).await;
            }
            tracing::info!("Broadcast fan-out stopped");
        })
    }

    /// イベントを受け付けた接続数を返す
    pub async fn deliver(&self, message: BroadcastMessage) -> usize {
        let event = ServerEvent::NewMessage(message.into());
        let delivered = self.message_pusher.broadcast(&event.to_json()).await;
        tracing::debug!("Fanned out new_message to {} connection(s)", delivered);
        delivered
    }
}
