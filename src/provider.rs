//! Provider trait for datagram sources

use crate::Result;

/// Outcome of one receive attempt.
#[derive(Debug)]
pub enum Received<T> {
    /// A datagram produced an item to publish
    Item(T),
    /// A datagram arrived but completed nothing (e.g. a video continuation)
    Partial,
    /// The receive timed out; an expected idle period
    Idle,
}

/// Trait for the receive side of a channel
///
/// A provider owns its socket and turns datagrams into items. Each call
/// performs at most one bounded receive, so the driver regains control at
/// least once per receive timeout.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// What the provider publishes
    type Item: Send + Sync + 'static;

    /// Channel name used in logs and errors
    fn channel(&self) -> &'static str;

    /// Receive one datagram, bounded by the provider's timeout
    ///
    /// Returns:
    /// - `Ok(Received::Item(item))` - Publish this item
    /// - `Ok(Received::Partial)` - Datagram consumed, nothing to publish
    /// - `Ok(Received::Idle)` - Timed out without data
    /// - `Err(e)` - Receive failed
    async fn next_item(&mut self) -> Result<Received<Self::Item>>;

    /// Called once when the receive loop ends, before the socket is dropped
    fn finish(&mut self) {}
}
