//! Local countdown between server timer pushes.
//!
//! Every push re-anchors the clock at `(value, now)`; the remaining time is
//! always computed from the anchor, never accumulated. One recurring task
//! publishes the interpolated value on a `watch` channel and is replaced on
//! every push.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Anchor of the latest server tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockState {
    pub anchor_value: f64,
    pub anchor_at: Instant,
}

impl ClockState {
    /// Non-finite or negative pushes anchor at zero.
    pub fn anchor(value: f64, at: Instant) -> Self {
        let anchor_value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        ClockState { anchor_value, anchor_at: at }
    }

    /// `max(0, value - elapsed)`; a `now` before the anchor counts as no time elapsed.
    pub fn remaining_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.anchor_at).as_secs_f64();
        (self.anchor_value - elapsed).max(0.0)
    }
}

pub struct ClockReconciler {
    state: Option<ClockState>,
    period: Duration,
    tx: Arc<watch::Sender<Option<f64>>>,
    task: Option<JoinHandle<()>>,
}

impl ClockReconciler {
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(10);

    pub fn new(period: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        ClockReconciler {
            state: None,
            period: period.max(Duration::from_millis(1)),
            tx: Arc::new(tx),
            task: None,
        }
    }

    /// Receiver of the interpolated countdown; `None` while no tick is pending.
    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.tx.subscribe()
    }

    /// Re-anchor on a server push and restart the recurring update.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_server_tick(&mut self, value: f64) {
        let state = ClockState::anchor(value, Instant::now());
        self.state = Some(state);
        self.stop_task();
        self.tx.send_replace(Some(state.anchor_value));

        if state.anchor_value <= 0.0 {
            return;
        }
        debug!(seconds = state.anchor_value, "clock re-anchored");

        let tx = Arc::clone(&self.tx);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let remaining = state.remaining_at(Instant::now());
                tx.send_replace(Some(remaining));
                if remaining <= 0.0 {
                    break;
                }
            }
        }));
    }

    /// Remaining seconds right now, `0.0` when no tick has been received.
    pub fn tick(&self) -> f64 {
        self.remaining().unwrap_or(0.0)
    }

    pub fn remaining(&self) -> Option<f64> {
        self.state.map(|s| s.remaining_at(Instant::now()))
    }

    pub fn state(&self) -> Option<ClockState> {
        self.state
    }

    /// True while the recurring update task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Forget the anchor and hide the clock.
    pub fn clear(&mut self) {
        self.stop_task();
        self.state = None;
        self.tx.send_replace(None);
    }

    fn stop_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for ClockReconciler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl Drop for ClockReconciler {
    fn drop(&mut self) {
        self.stop_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_clamped_and_never_backwards() {
        let t0 = Instant::now();
        let clock = ClockState::anchor(2.0, t0);
        assert_eq!(clock.remaining_at(t0), 2.0);
        assert!((clock.remaining_at(t0 + Duration::from_millis(500)) - 1.5).abs() < 1e-9);
        assert_eq!(clock.remaining_at(t0 + Duration::from_secs(5)), 0.0);

        let later = ClockState::anchor(2.0, t0 + Duration::from_secs(1));
        assert_eq!(later.remaining_at(t0), 2.0);
    }

    #[test]
    fn garbage_pushes_anchor_at_zero() {
        let t0 = Instant::now();
        assert_eq!(ClockState::anchor(-3.0, t0).anchor_value, 0.0);
        assert_eq!(ClockState::anchor(f64::NAN, t0).anchor_value, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn unanchored_clock_reads_zero() {
        let clock = ClockReconciler::default();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(*clock.subscribe().borrow(), None);
        assert!(!clock.is_running());
    }
}
