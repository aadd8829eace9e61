//! Video datagram reassembly and delivery.
//!
//! Raw datagrams from the video channel are fed to a [`VideoReassembler`],
//! which emits completed [`VideoAccessUnit`]s into a bounded, drop-oldest
//! [`UnitQueue`]. Consumers read the queue through a [`VideoStream`].

mod queue;
mod reassembler;

pub use queue::UnitQueue;
pub use reassembler::{ReassemblyStats, VideoReassembler};

use futures::stream::{BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::VideoAccessUnit;

/// Stream of completed access units, oldest first.
///
/// Units evicted from the queue before this stream polls them are never
/// seen. The stream does not end on its own; drop it to stop consuming.
pub struct VideoStream {
    inner: BoxStream<'static, VideoAccessUnit>,
    queue: Arc<UnitQueue>,
}

impl VideoStream {
    pub fn new(queue: Arc<UnitQueue>) -> Self {
        let inner = futures::stream::unfold(Arc::clone(&queue), |queue| async move {
            let unit = queue.next().await;
            Some((unit, queue))
        })
        .boxed();

        Self { inner, queue }
    }

    /// Take a unit without waiting.
    pub fn try_next_unit(&self) -> Option<VideoAccessUnit> {
        self.queue.pop()
    }
}

impl Stream for VideoStream {
    type Item = VideoAccessUnit;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stream_yields_reassembled_units_in_order() {
        let queue = Arc::new(UnitQueue::new(5));
        let mut reassembler = VideoReassembler::new(Arc::clone(&queue));
        let mut stream = VideoStream::new(queue);

        reassembler.feed(&[1u8; 1460]);
        reassembler.feed(&[1u8; 40]);
        reassembler.feed(&[2u8; 99]);

        let first = tokio::time::timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        assert_eq!(first.map(|u| u.len()), Some(1500));
        assert_eq!(second.map(|u| u.len()), Some(99));
        assert!(stream.try_next_unit().is_none());
    }
}
