use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::warn;

use crate::clock::Tick;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassEvent {
    Key(KeyEvent),
    Resize,
    Tick(Tick),
    /// the input producer went away; nothing can quit the app after this
    InputClosed,
}

/// Sending half owned by the input producer. Posts `InputClosed` when dropped.
pub struct InputSender {
    tx: Sender<PassEvent>,
}

impl InputSender {
    pub fn new(tx: Sender<PassEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, ev: PassEvent) -> Result<(), SendError<PassEvent>> {
        self.tx.send(ev)
    }
}

impl Drop for InputSender {
    fn drop(&mut self) {
        let _ = self.tx.send(PassEvent::InputClosed);
    }
}

/// Source of terminal events (keyboard, resize) that timers can post into
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<PassEvent, RecvTimeoutError>;

    /// Handle for producers (the live clock timer) to inject events
    fn sender(&self) -> Sender<PassEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<PassEvent>,
    rx: Receiver<PassEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = InputSender::new(tx.clone());

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // windows reports releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => PassEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => PassEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal event reader stopped");
                    break;
                }
            };
            if reader_tx.send(ev).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PassEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<PassEvent> {
        self.tx.clone()
    }
}

/// Channel-backed event source for tests
pub struct TestEventSource {
    tx: Sender<PassEvent>,
    rx: Receiver<PassEvent>,
}

impl TestEventSource {
    /// Returns the source and a sender for scripting input.
    /// Dropping the sender closes input like a dead terminal reader.
    pub fn channel() -> (Self, InputSender) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                tx: tx.clone(),
                rx,
            },
            InputSender::new(tx),
        )
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PassEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<PassEvent> {
        self.tx.clone()
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    poll: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, poll: Duration) -> Self {
        Self { event_source, poll }
    }

    pub fn sender(&self) -> Sender<PassEvent> {
        self.event_source.sender()
    }

    /// Blocks up to the poll interval; None when nothing arrived
    pub fn step(&self) -> Option<PassEvent> {
        match self.event_source.recv_timeout(self.poll) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(PassEvent::InputClosed),
        }
    }
}
