//! Idle/Blinking state machine shared by the title and element blinkers.

use std::mem;

use crate::ticker::TickerHandle;

/// State of one blinker. `Blinking` owns the ticker, so a running timer always
/// has a handle and clearing the state always cancels the timer.
#[derive(Debug)]
enum BlinkState<T> {
    /// No blink in progress.
    Idle,
    /// Blink in progress.
    Blinking {
        /// Running ticker; dropped (and cancelled) on transition to `Idle`.
        ticker: TickerHandle,
        /// Identifies this run so stale ticks of an earlier run are ignored.
        generation: u64,
        /// Data needed to restore the host when the blink ends.
        restore: T,
    },
}

/// One blinker slot: its current state plus a generation counter.
#[derive(Debug)]
pub struct BlinkSlot<T> {
    /// Current state.
    state: BlinkState<T>,
    /// Generation handed to the next run.
    next_generation: u64,
}

impl<T> Default for BlinkSlot<T> {
    fn default() -> Self {
        Self {
            state: BlinkState::Idle,
            next_generation: 1,
        }
    }
}

impl<T> BlinkSlot<T> {
    /// Whether a blink is currently running.
    pub fn is_blinking(&self) -> bool {
        matches!(self.state, BlinkState::Blinking { .. })
    }

    /// Whether `generation` identifies the run currently in progress.
    pub fn is_current(&self, generation: u64) -> bool {
        matches!(self.state, BlinkState::Blinking { generation: g, .. } if g == generation)
    }

    /// Reserve the generation for the next run.
    pub fn reserve(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Enter `Blinking`. Any previous run is cancelled first.
    pub fn start(&mut self, ticker: TickerHandle, generation: u64, restore: T) {
        self.state = BlinkState::Blinking {
            ticker,
            generation,
            restore,
        };
    }

    /// Return to `Idle`, cancelling the ticker. Yields the restore data of the
    /// run that was in progress, if any.
    pub fn stop(&mut self) -> Option<T> {
        match mem::replace(&mut self.state, BlinkState::Idle) {
            BlinkState::Idle => None,
            BlinkState::Blinking {
                ticker, restore, ..
            } => {
                ticker.cancel();
                Some(restore)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use tokio::{runtime::Handle, time::sleep};

    use super::*;
    use crate::ticker::{self, TickFlow};

    fn idle_ticker() -> TickerHandle {
        ticker::spawn(
            &Handle::current(),
            "test",
            Duration::from_secs(60),
            Duration::from_secs(60),
            || TickFlow::Continue,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_round_trip_restore_data() {
        let mut slot = BlinkSlot::default();
        assert!(!slot.is_blinking());
        assert_eq!(slot.stop(), None::<String>);

        let g = slot.reserve();
        slot.start(idle_ticker(), g, "original".to_string());
        assert!(slot.is_blinking());
        assert!(slot.is_current(g));

        assert_eq!(slot.stop().as_deref(), Some("original"));
        assert!(!slot.is_blinking());
        assert!(!slot.is_current(g));
    }

    #[tokio::test(start_paused = true)]
    async fn generations_distinguish_runs() {
        let mut slot = BlinkSlot::default();
        let first = slot.reserve();
        slot.start(idle_ticker(), first, ());
        slot.stop();
        let second = slot.reserve();
        slot.start(idle_ticker(), second, ());
        assert_ne!(first, second);
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_ticker() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let mut slot = BlinkSlot::default();
        let g = slot.reserve();
        let handle = ticker::spawn(
            &Handle::current(),
            "test",
            Duration::from_millis(10),
            Duration::from_millis(10),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                TickFlow::Continue
            },
        );
        slot.start(handle, g, ());
        sleep(Duration::from_millis(25)).await;
        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 1);

        slot.stop();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }
}
