//! Fan-out from one upstream pump to many independently-paced consumers
//! (C5, spec §3 "four output streams").
//!
//! A bounded `tokio::mpsc` channel per consumer, not a `broadcast` channel:
//! `broadcast` drops the slowest receiver's backlog under pressure (lagged
//! receivers get `RecvError::Lagged`), which is wrong here — every
//! consumer of `partial_object_stream`/`element_stream`/`text_stream`/
//! `full_stream` must see every event it's entitled to, in order, with no
//! silently-skipped items. A slow consumer should push back on the pump
//! instead.

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

/// Default per-consumer channel depth, overridable at construction.
pub const DEFAULT_BUFFER_DEPTH: usize = 64;

/// Fans a single upstream sequence out to any number of subscribers.
///
/// Subscribers may be added at any point before the upstream pump
/// finishes; each receives every item published after it subscribed.
pub struct Multiplexer<T> {
    capacity: usize,
    senders: Mutex<Vec<mpsc::Sender<T>>>,
}

impl<T> Multiplexer<T> {
    /// Builds a multiplexer with the given per-consumer buffer depth.
    pub fn new(capacity: usize) -> Self {
        Multiplexer {
            capacity,
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<T> Default for Multiplexer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_DEPTH)
    }
}

impl<T: Clone + Send + 'static> Multiplexer<T> {
    /// Registers a new consumer and returns its stream.
    pub async fn subscribe(&self) -> impl Stream<Item = T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.senders.lock().await.push(tx);
        ReceiverStream::new(rx)
    }

    /// Publishes `value` to every live subscriber, awaiting each
    /// consumer's own backpressure independently so one slow consumer
    /// never starves another. Subscribers whose receiver has been
    /// dropped are pruned.
    pub async fn publish(&self, value: T) {
        let senders = self.senders.lock().await.clone();
        let sends = senders.into_iter().map(|tx| {
            let value = value.clone();
            async move {
                let ok = tx.send(value).await.is_ok();
                (ok, tx)
            }
        });
        let results = futures::future::join_all(sends).await;
        let mut live = self.senders.lock().await;
        live.retain(|tx| results.iter().any(|(ok, kept)| *ok && kept.same_channel(tx)));
    }

    /// Number of currently-registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.senders.lock().await.len()
    }
}

/// Drains `upstream` into `multiplexer`, one publish per item, until the
/// upstream ends — at which point every subscriber's channel closes and
/// their streams end too.
pub fn spawn_pump<T, S>(multiplexer: Arc<Multiplexer<T>>, mut upstream: S) -> JoinHandle<()>
where
    T: Clone + Send + 'static,
    S: Stream<Item = T> + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        while let Some(item) = upstream.next().await {
            multiplexer.publish(item).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt as _;

    #[tokio::test]
    async fn test_single_subscriber_receives_all_items() {
        let mux: Multiplexer<u32> = Multiplexer::new(4);
        let stream = mux.subscribe().await;
        mux.publish(1).await;
        mux.publish(2).await;
        drop(mux);

        let items: Vec<_> = stream.collect().await;
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_see_every_item() {
        let mux: Multiplexer<u32> = Multiplexer::new(4);
        let a = mux.subscribe().await;
        let b = mux.subscribe().await;
        mux.publish(7).await;
        drop(mux);

        assert_eq!(a.collect::<Vec<_>>().await, vec![7]);
        assert_eq!(b.collect::<Vec<_>>().await, vec![7]);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned_without_blocking_others() {
        let mux: Multiplexer<u32> = Multiplexer::new(1);
        let stream = mux.subscribe().await;
        drop(stream);
        mux.publish(1).await;
        assert_eq!(mux.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_spawn_pump_drains_upstream_to_subscribers() {
        let mux = Arc::new(Multiplexer::<u32>::new(4));
        let stream = mux.subscribe().await;
        let upstream = tokio_stream::iter(vec![1, 2, 3]);
        let handle = spawn_pump(Arc::clone(&mux), upstream);
        handle.await.unwrap();
        drop(mux);

        assert_eq!(stream.collect::<Vec<_>>().await, vec![1, 2, 3]);
    }
}
