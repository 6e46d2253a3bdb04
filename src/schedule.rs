//! Injected time sources.
//!
//! Polling cadence and "now" are supplied from outside so that the usage
//! classifier and fetch controller never touch timers or the wall clock.
//! Tests drive [`ManualTicker`] and [`FixedClock`] explicitly.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A sequence of ticks driving periodic work.
pub trait Ticker: Send {
    /// Waits for the next tick. Returns `false` once no more ticks will come.
    fn tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Ticks on a fixed real-time period, optionally a bounded number of times.
///
/// The first tick completes immediately. Missed ticks are delayed rather
/// than bunched up.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
    remaining: Option<u32>,
}

impl IntervalTicker {
    /// Creates an unbounded ticker.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            remaining: None,
        }
    }

    /// Stops after `count` ticks.
    #[must_use]
    pub fn take(mut self, count: u32) -> Self {
        self.remaining = Some(count);
        self
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(0) => return false,
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        self.interval.tick().await;
        true
    }
}

/// A ticker fired by hand through its paired [`TickTrigger`].
#[derive(Debug)]
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Fires ticks on a [`ManualTicker`]. Dropping every trigger ends the ticker.
#[derive(Debug, Clone)]
pub struct TickTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTicker {
    pub fn new() -> (Self, TickTrigger) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, TickTrigger { tx })
    }
}

impl TickTrigger {
    /// Queues one tick. Returns `false` if the ticker has been dropped.
    pub fn fire(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}
