//! Reassembled video access units

use std::ops::Deref;
use std::sync::Arc;

/// One reassembled elementary-stream frame.
///
/// This is the unit that flows from the video channel to the decoder. The
/// bytes are shared, so cloning a unit never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAccessUnit {
    /// Payload bytes (zero-copy via Arc)
    pub data: Arc<[u8]>,

    /// Monotonic counter assigned by the reassembler
    pub sequence: u64,
}

impl VideoAccessUnit {
    /// Create a new access unit
    pub fn new(data: Vec<u8>, sequence: u64) -> Self {
        Self { data: data.into(), sequence }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Deref for VideoAccessUnit {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for VideoAccessUnit {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
