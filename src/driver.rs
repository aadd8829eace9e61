//! Driver spawns and manages receive loop tasks

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::provider::{Provider, Received};
use crate::ChannelHealth;

/// Where a receive loop publishes
pub struct DriverOutputs<T> {
    /// Latest item; `None` before the first item and after the loop ends
    pub items: Arc<watch::Sender<Option<Arc<T>>>>,
    /// Loop health
    pub health: Arc<watch::Sender<ChannelHealth>>,
    /// Consecutive receive failures before reporting `Degraded`
    pub degraded_after: u32,
}

/// Handle to a running receive loop
///
/// Dropping the handle cancels the loop without waiting for it.
pub struct DriverHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Cancel the loop and wait until it has released its socket.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Receive loop task failed: {}", e);
            }
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            debug!("Dropping running receive loop");
        }
        self.cancel.cancel();
    }
}

/// Driver spawns and manages receive loop tasks
///
/// Each loop owns its provider (and therefore its socket) exclusively and
/// processes datagrams strictly in receive order.
pub struct Driver;

impl Driver {
    /// Spawn a receive loop for the given provider
    pub fn spawn<P>(provider: P, outputs: DriverOutputs<P::Item>) -> DriverHandle
    where
        P: Provider,
    {
        let cancel = CancellationToken::new();
        let cancel_loop = cancel.clone();

        let task = tokio::spawn(async move {
            Self::receive_task(provider, outputs, cancel_loop).await;
        });

        DriverHandle { cancel, task: Some(task) }
    }

    /// Receive loop - one bounded receive per iteration
    ///
    /// Cancellation is checked once per iteration and raced against the
    /// receive, so the loop ends no later than one receive timeout after
    /// the token is cancelled.
    async fn receive_task<P>(mut provider: P, outputs: DriverOutputs<P::Item>, cancel: CancellationToken)
    where
        P: Provider,
    {
        let channel = provider.channel();
        info!(channel, "Receive loop started");

        let mut item_count = 0u64;
        let mut failures = 0u32;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = provider.next_item() => result,
            };

            match result {
                Ok(Received::Item(item)) => {
                    item_count += 1;
                    Self::recovered(channel, &mut failures, &outputs.health);
                    outputs.items.send_replace(Some(Arc::new(item)));
                }
                Ok(Received::Partial) => {
                    Self::recovered(channel, &mut failures, &outputs.health);
                }
                Ok(Received::Idle) => {
                    trace!(channel, "Receive timeout, continuing");
                }
                Err(e) => {
                    failures += 1;
                    warn!(channel, failures, "Receive error: {}", e);

                    if failures >= outputs.degraded_after {
                        if failures == outputs.degraded_after {
                            error!(channel, "Channel degraded after {} consecutive failures", failures);
                        }
                        outputs
                            .health
                            .send_replace(ChannelHealth::Degraded { consecutive_failures: failures });
                    }

                    // Back off 100ms, 200ms, 400ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << failures.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        provider.finish();
        outputs.items.send_replace(None);
        outputs.health.send_replace(ChannelHealth::Healthy);

        info!(channel, "Receive loop ended (published {} items)", item_count);
    }

    fn recovered(channel: &'static str, failures: &mut u32, health: &watch::Sender<ChannelHealth>) {
        if *failures > 0 {
            debug!(channel, "Receive recovered after {} failures", failures);
            *failures = 0;
            health.send_replace(ChannelHealth::Healthy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientError, Result};
    use std::collections::VecDeque;

    /// Provider replaying a script of outcomes, then idling
    struct ScriptedProvider {
        script: VecDeque<Result<Received<u32>>>,
        finished: Arc<std::sync::atomic::AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        type Item = u32;

        fn channel(&self) -> &'static str {
            "scripted"
        }

        async fn next_item(&mut self) -> Result<Received<u32>> {
            match self.script.pop_front() {
                Some(step) => step,
                None => {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(Received::Idle)
                }
            }
        }

        fn finish(&mut self) {
            self.finished.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    fn failure() -> Result<Received<u32>> {
        Err(ClientError::receive_failed("scripted", std::io::Error::other("boom")))
    }

    fn outputs(degraded_after: u32) -> DriverOutputs<u32> {
        DriverOutputs {
            items: Arc::new(watch::channel(None).0),
            health: Arc::new(watch::channel(ChannelHealth::Healthy).0),
            degraded_after,
        }
    }

    #[tokio::test]
    async fn publishes_items_and_clears_on_stop() {
        let finished = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let provider = ScriptedProvider {
            script: VecDeque::from([
                Ok(Received::Idle),
                Ok(Received::Item(1)),
                Ok(Received::Partial),
                Ok(Received::Item(2)),
            ]),
            finished: Arc::clone(&finished),
        };
        let outputs = outputs(3);
        let mut items = outputs.items.subscribe();

        let handle = Driver::spawn(provider, outputs);

        tokio::time::timeout(Duration::from_secs(1), items.wait_for(|v| v.as_deref() == Some(&2)))
            .await
            .expect("second item published")
            .unwrap();

        handle.stop().await;
        assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
        assert!(items.borrow().is_none());
    }

    #[tokio::test]
    async fn consecutive_failures_degrade_then_recover() {
        let provider = ScriptedProvider {
            script: VecDeque::from([failure(), failure(), failure(), Ok(Received::Item(9))]),
            finished: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        };
        let outputs = outputs(3);
        let mut health = outputs.health.subscribe();
        let mut items = outputs.items.subscribe();

        let handle = Driver::spawn(provider, outputs);

        tokio::time::timeout(Duration::from_secs(5), health.wait_for(|h| h.is_degraded()))
            .await
            .expect("degraded after three failures")
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), items.wait_for(|v| v.is_some()))
            .await
            .expect("item after recovery")
            .unwrap();
        assert_eq!(*health.borrow(), ChannelHealth::Healthy);

        handle.stop().await;
    }

    #[tokio::test]
    async fn failures_below_threshold_stay_healthy() {
        let provider = ScriptedProvider {
            script: VecDeque::from([failure(), failure(), Ok(Received::Partial), failure()]),
            finished: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        };
        let outputs = outputs(3);
        let health = outputs.health.subscribe();

        let handle = Driver::spawn(provider, outputs);
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(*health.borrow(), ChannelHealth::Healthy);

        handle.stop().await;
    }
}
