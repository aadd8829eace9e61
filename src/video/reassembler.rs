//! Access unit reassembly from raw video datagrams
//!
//! The link carries no length prefix or frame marker. A datagram shorter than
//! the maximum payload size ends the current access unit; a maximum-size
//! datagram continues it. When a unit's final fragment happens to be exactly
//! the maximum size, it cannot be told apart from a continuation and the
//! following unit is merged into it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::queue::UnitQueue;
use crate::VideoAccessUnit;
use crate::config::MAX_VIDEO_DATAGRAM;

/// Running counters for the reassembled stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassemblyStats {
    /// Access units completed since the last reset
    pub units: u64,
    /// Payload bytes across those units
    pub total_bytes: u64,
    /// Size of the most recent unit
    pub last_unit_bytes: usize,
    /// Units dropped by the queue to make room
    pub evicted: u64,
}

/// Stateful accumulator turning datagrams into [`VideoAccessUnit`]s.
#[derive(Debug)]
pub struct VideoReassembler {
    buffer: Vec<u8>,
    max_datagram: usize,
    queue: Arc<UnitQueue>,
    next_sequence: u64,
    stats: ReassemblyStats,
}

impl VideoReassembler {
    /// Reassembler for the standard 1460-byte link pushing into `queue`.
    pub fn new(queue: Arc<UnitQueue>) -> Self {
        Self::with_max_datagram(queue, MAX_VIDEO_DATAGRAM)
    }

    pub fn with_max_datagram(queue: Arc<UnitQueue>, max_datagram: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_datagram.saturating_mul(16)),
            max_datagram,
            queue,
            next_sequence: 0,
            stats: ReassemblyStats::default(),
        }
    }

    /// Append one datagram; returns the completed unit when it ends one.
    ///
    /// A completed unit is also pushed into the queue, evicting the oldest
    /// queued unit when the queue is full.
    pub fn feed(&mut self, datagram: &[u8]) -> Option<VideoAccessUnit> {
        self.buffer.extend_from_slice(datagram);

        if datagram.len() >= self.max_datagram || self.buffer.is_empty() {
            return None;
        }

        let fresh = Vec::with_capacity(self.max_datagram.saturating_mul(16));
        let data = std::mem::replace(&mut self.buffer, fresh);
        let unit = VideoAccessUnit::new(data, self.next_sequence);
        self.next_sequence += 1;

        self.stats.units += 1;
        self.stats.total_bytes += unit.len() as u64;
        self.stats.last_unit_bytes = unit.len();

        trace!(sequence = unit.sequence, bytes = unit.len(), "Access unit complete");

        if self.queue.push(unit.clone()).is_some() {
            self.stats.evicted += 1;
        }
        Some(unit)
    }

    /// Discard the partial unit and everything queued.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.queue.clear();
        self.next_sequence = 0;
        self.stats = ReassemblyStats::default();
    }

    /// Bytes accumulated for the unit in progress
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    pub fn queue(&self) -> &Arc<UnitQueue> {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassembler(depth: usize) -> VideoReassembler {
        VideoReassembler::new(Arc::new(UnitQueue::new(depth)))
    }

    #[test]
    fn three_full_datagrams_and_a_short_one_make_one_unit() {
        let mut reassembler = reassembler(5);

        for _ in 0..3 {
            assert!(reassembler.feed(&[0xAB; MAX_VIDEO_DATAGRAM]).is_none());
        }
        let unit = reassembler.feed(&[0xCD; 800]).expect("short datagram ends the unit");

        assert_eq!(unit.len(), 3 * 1460 + 800);
        assert_eq!(&unit[..1460], &[0xAB; 1460][..]);
        assert_eq!(&unit[4380..], &[0xCD; 800][..]);
        assert_eq!(reassembler.pending_bytes(), 0);
        assert_eq!(reassembler.queue().len(), 1);
    }

    #[test]
    fn single_short_datagram_is_a_unit() {
        let mut reassembler = reassembler(5);
        let unit = reassembler.feed(&[1u8; 200]).expect("immediate unit");
        assert_eq!(unit.len(), 200);
        assert_eq!(unit.sequence, 0);
    }

    #[test]
    fn full_size_final_fragment_merges_units() {
        let mut reassembler = reassembler(5);
        assert!(reassembler.feed(&[1u8; 1460]).is_none());
        assert!(reassembler.feed(&[2u8; 1460]).is_none());
        let merged = reassembler.feed(&[3u8; 10]).unwrap();
        assert_eq!(merged.len(), 2 * 1460 + 10);
    }

    #[test]
    fn oversized_datagram_continues_unit() {
        let mut reassembler = reassembler(5);
        assert!(reassembler.feed(&[1u8; 1500]).is_none());
        assert_eq!(reassembler.feed(&[2u8; 4]).unwrap().len(), 1504);
    }

    #[test]
    fn empty_datagram_on_empty_buffer_emits_nothing() {
        let mut reassembler = reassembler(5);
        assert!(reassembler.feed(&[]).is_none());
        assert_eq!(reassembler.stats().units, 0);
    }

    #[test]
    fn stats_and_eviction_are_tracked() {
        let mut reassembler = reassembler(2);
        for len in [100usize, 200, 300] {
            reassembler.feed(&vec![0u8; len]);
        }

        let stats = reassembler.stats();
        assert_eq!(stats.units, 3);
        assert_eq!(stats.total_bytes, 600);
        assert_eq!(stats.last_unit_bytes, 300);
        assert_eq!(stats.evicted, 1);
        assert_eq!(reassembler.queue().len(), 2);
    }

    #[test]
    fn reset_clears_buffer_and_queue() {
        let mut reassembler = reassembler(5);
        reassembler.feed(&[0u8; 100]);
        reassembler.feed(&[0u8; 1460]);
        assert_eq!(reassembler.pending_bytes(), 1460);

        reassembler.reset();
        assert_eq!(reassembler.pending_bytes(), 0);
        assert!(reassembler.queue().is_empty());
        assert_eq!(reassembler.stats(), ReassemblyStats::default());
        assert_eq!(reassembler.feed(&[0u8; 5]).unwrap().sequence, 0);
    }
}
