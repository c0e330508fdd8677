use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Default refresh rate of the live clock
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Source of wall-clock readings
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and demos
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: Mutex::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.at.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut at = self.at.lock().unwrap_or_else(|e| e.into_inner());
        *at += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Background timer that invokes a callback every `interval` until cancelled.
///
/// Cancelling (explicitly or by dropping) joins the worker thread, so once
/// `cancel` returns the callback will not run again.
#[derive(Debug)]
pub struct RepeatingTimer {
    cancel_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTimer {
    pub fn start<F>(interval: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match cancel_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if callback().is_break() {
                            break;
                        }
                        deadline += interval;
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        // dropping the sender wakes the worker
        self.cancel_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A clock reading produced by the live clock's timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// mount the tick belongs to; ticks from an earlier mount are stale
    pub generation: u64,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
enum ClockState {
    Idle,
    Ticking { timer: RepeatingTimer },
}

/// Current-time display that refreshes itself while mounted
#[derive(Debug)]
pub struct LiveClock {
    state: ClockState,
    generation: u64,
    current: DateTime<Utc>,
}

impl LiveClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: ClockState::Idle,
            generation: 0,
            current: now,
        }
    }

    pub fn is_ticking(&self) -> bool {
        matches!(self.state, ClockState::Ticking { .. })
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start refreshing. Every `interval` the clock is read and handed to
    /// `sink`; the timer stops on its own if `sink` returns false.
    /// Mounting an already ticking clock restarts it.
    pub fn mount<S>(&mut self, interval: Duration, clock: Arc<dyn Clock>, sink: S)
    where
        S: Fn(Tick) -> bool + Send + 'static,
    {
        self.unmount();
        self.generation += 1;
        self.current = clock.now();

        let generation = self.generation;
        let timer = RepeatingTimer::start(interval, move || {
            let tick = Tick {
                generation,
                at: clock.now(),
            };
            if sink(tick) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
        debug!(generation, interval_ms = interval.as_millis() as u64, "clock mounted");
        self.state = ClockState::Ticking { timer };
    }

    /// Stop refreshing. Safe to call when idle.
    pub fn unmount(&mut self) {
        if let ClockState::Ticking { mut timer } =
            std::mem::replace(&mut self.state, ClockState::Idle)
        {
            timer.cancel();
            debug!(generation = self.generation, "clock unmounted");
        }
    }

    /// Apply a tick. Returns true if the displayed time changed.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if !self.is_ticking() || tick.generation != self.generation {
            return false;
        }
        let changed = self.current != tick.at;
        self.current = tick.at;
        changed
    }
}
