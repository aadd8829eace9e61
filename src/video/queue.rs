//! Drop-oldest queue of completed access units

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;
use tracing::trace;

use crate::VideoAccessUnit;

/// Bounded FIFO between the video receive loop and its consumer.
///
/// Holds at most `capacity` units. Pushing into a full queue evicts the
/// oldest unit first, so the producer never blocks and consumers always see
/// the freshest video. One mutex guards both enqueue-with-eviction and
/// dequeue.
#[derive(Debug)]
pub struct UnitQueue {
    inner: Mutex<Inner>,
    capacity: usize,
    ready: Notify,
}

#[derive(Debug, Default)]
struct Inner {
    units: VecDeque<VideoAccessUnit>,
    evicted: u64,
}

impl UnitQueue {
    /// Create a queue holding at most `capacity` units (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                units: VecDeque::with_capacity(capacity),
                evicted: 0,
            }),
            capacity,
            ready: Notify::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a unit, evicting the oldest when full.
    ///
    /// Returns the evicted unit, if any.
    pub fn push(&self, unit: VideoAccessUnit) -> Option<VideoAccessUnit> {
        let evicted = {
            let mut inner = self.lock();
            let evicted = if inner.units.len() >= self.capacity {
                inner.evicted += 1;
                inner.units.pop_front()
            } else {
                None
            };
            inner.units.push_back(unit);
            evicted
        };

        if let Some(old) = &evicted {
            trace!(sequence = old.sequence, bytes = old.len(), "Evicted stale access unit");
        }
        self.ready.notify_one();
        evicted
    }

    /// Remove and return the oldest unit.
    pub fn pop(&self) -> Option<VideoAccessUnit> {
        self.lock().units.pop_front()
    }

    /// Wait until a unit is available and return it.
    pub async fn next(&self) -> VideoAccessUnit {
        loop {
            let notified = self.ready.notified();
            if let Some(unit) = self.pop() {
                return unit;
            }
            notified.await;
        }
    }

    /// Remove everything queued.
    pub fn clear(&self) {
        self.lock().units.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().units.is_empty()
    }

    /// Number of units dropped to make room since creation
    pub fn evicted(&self) -> u64 {
        self.lock().evicted
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the deque inconsistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn unit(sequence: u64) -> VideoAccessUnit {
        VideoAccessUnit::new(vec![sequence as u8; 4], sequence)
    }

    #[test]
    fn keeps_last_five_of_seven() {
        let queue = UnitQueue::new(5);
        for sequence in 0..7 {
            queue.push(unit(sequence));
        }

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.evicted(), 2);
        let kept: Vec<u64> = std::iter::from_fn(|| queue.pop()).map(|u| u.sequence).collect();
        assert_eq!(kept, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn push_returns_evicted_unit() {
        let queue = UnitQueue::new(1);
        assert!(queue.push(unit(1)).is_none());
        let evicted = queue.push(unit(2)).expect("full queue evicts");
        assert_eq!(evicted.sequence, 1);
        assert_eq!(queue.pop().map(|u| u.sequence), Some(2));
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let queue = UnitQueue::new(0);
        assert_eq!(queue.capacity(), 1);
    }

    #[test]
    fn clear_empties_queue() {
        let queue = UnitQueue::new(3);
        queue.push(unit(1));
        queue.push(unit(2));
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[tokio::test]
    async fn next_wakes_on_push() {
        let queue = Arc::new(UnitQueue::new(5));
        let producer = Arc::clone(&queue);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            producer.push(unit(42));
        });

        let received = tokio::time::timeout(Duration::from_secs(1), queue.next())
            .await
            .expect("consumer should be woken by push");
        assert_eq!(received.sequence, 42);
        handle.await.unwrap();
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity_and_keeps_order(capacity in 1usize..10, pushes in 0u64..40) {
            let queue = UnitQueue::new(capacity);
            for sequence in 0..pushes {
                queue.push(unit(sequence));
                prop_assert!(queue.len() <= capacity);
            }

            let kept: Vec<u64> = std::iter::from_fn(|| queue.pop()).map(|u| u.sequence).collect();
            let first = pushes.saturating_sub(capacity as u64);
            prop_assert_eq!(kept, (first..pushes).collect::<Vec<_>>());
            prop_assert_eq!(queue.evicted(), first);
        }
    }
}
