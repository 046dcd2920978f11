//! Periodic ticks with cancellation support.
//!
//! Runs a callback after an initial delay and then on a fixed interval until
//! either the callback asks to stop or the owning [`TickerHandle`] is dropped
//! or cancelled.

use std::time::Duration;

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// What a tick callback wants the ticker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep ticking.
    Continue,
    /// Stop after this tick.
    Stop,
}

/// Owned handle of a running ticker. Dropping it cancels the ticker.
#[derive(Debug)]
pub struct TickerHandle {
    /// Label used in trace output.
    label: &'static str,
    /// Cancels the tick loop.
    token: CancellationToken,
    /// The spawned tick loop.
    handle: JoinHandle<()>,
}

impl TickerHandle {
    /// Whether the tick loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the ticker. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        // Let the loop observe the token; never abort mid-tick.
        self.token.cancel();
        trace!("ticker_stop" = %self.label);
    }
}

/// Spawn a ticker on `runtime` that calls `on_tick` after `initial`, then every `interval`.
pub fn spawn<F>(
    runtime: &Handle,
    label: &'static str,
    initial: Duration,
    interval: Duration,
    mut on_tick: F,
) -> TickerHandle
where
    F: FnMut() -> TickFlow + Send + 'static,
{
    let token = CancellationToken::new();
    let cancel = token.clone();

    let fut = async move {
        trace!(
            "ticker_start" = %label,
            init_ms = initial.as_millis(),
            int_ms = interval.as_millis()
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                trace!("ticker_cancelled_initial" = %label);
                return;
            }
            _ = time::sleep(initial) => {}
        }

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    trace!("ticker_cancelled" = %label);
                    return;
                }
                _ = ticker.tick() => {
                    if on_tick() == TickFlow::Stop {
                        trace!("ticker_done" = %label);
                        return;
                    }
                }
            }
        }
    };

    TickerHandle {
        label,
        token,
        handle: runtime.spawn(fut),
    }
}
