use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

/// キーごとの broadcast チャネル束。
/// 購読は同期的に行えるよう std の RwLock を使う（保持中に await しない）。
pub struct SnapshotHub<T: Clone> {
    capacity: usize,
    channels: RwLock<HashMap<String, broadcast::Sender<T>>>,
}

impl<T: Clone> SnapshotHub<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: RwLock::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self, key: &str) -> broadcast::Receiver<T> {
        if let Some(sender) = self
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return sender.subscribe();
        }

        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(key.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 配信した購読者数を返す。購読者がいなければ 0
    pub fn publish(&self, key: &str, value: T) -> usize {
        let channels = self
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match channels.get(key) {
            Some(sender) => sender.send(value).unwrap_or(0),
            None => 0,
        }
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, |sender| sender.receiver_count())
    }
}
