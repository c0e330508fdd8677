use std::sync::mpsc::Sender;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::clock::{Clock, LiveClock};
use crate::config::{Config, Presentation};
use crate::expiry::ClockReading;
use crate::pass::PassType;
use crate::runtime::PassEvent;
use crate::session::Session;
use crate::zone::Zone;

/// Screens the UI can stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Select,
    Active,
}

/// Holds the session and wires user intents to it
pub struct App {
    pub config: Config,
    pub session: Session,
    pub live_clock: LiveClock,
    pub zone: Zone,
    clock: Arc<dyn Clock>,
    events: Sender<PassEvent>,
    should_quit: bool,
}

impl App {
    /// `events` is where the live clock posts its ticks
    pub fn new(config: Config, clock: Arc<dyn Clock>, events: Sender<PassEvent>) -> Self {
        let zone = Zone::from_name(config.timezone.as_deref());
        let session = Session::new(config.catalog, config.default_pass);
        let live_clock = LiveClock::new(clock.now());
        Self {
            config,
            session,
            live_clock,
            zone,
            clock,
            events,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.live_clock.unmount();
        self.should_quit = true;
    }

    pub fn activate(&mut self) {
        self.session.activate(self.clock.now());
        let tx = self.events.clone();
        self.live_clock.mount(
            self.config.tick_interval(),
            self.clock.clone(),
            move |tick| tx.send(PassEvent::Tick(tick)).is_ok(),
        );
    }

    /// Close the active pass. The live clock stops before this returns.
    pub fn reset(&mut self) {
        self.live_clock.unmount();
        self.session.reset();
    }

    pub fn select_pass(&mut self, pass: PassType) -> bool {
        self.session.select_pass_type(pass)
    }

    /// Select the `n`-th offered pass, zero based
    pub fn select_nth(&mut self, n: usize) -> bool {
        match self.session.catalog().offered().get(n) {
            Some(pass) => self.select_pass(*pass),
            None => false,
        }
    }

    pub fn select_next(&mut self) -> bool {
        self.step_selection(1)
    }

    pub fn select_prev(&mut self) -> bool {
        let len = self.session.catalog().offered().len();
        self.step_selection(len.saturating_sub(1))
    }

    fn step_selection(&mut self, by: usize) -> bool {
        let catalog = self.session.catalog();
        let len = catalog.offered().len();
        let idx = catalog.position(self.session.selected_pass()).unwrap_or(0);
        self.select_nth((idx + by) % len.max(1))
    }

    /// Screens to draw, bottom first
    pub fn layers(&self) -> Vec<Layer> {
        match (self.config.presentation, self.session.is_activated()) {
            (_, false) => vec![Layer::Select],
            (Presentation::Overlay, true) => vec![Layer::Select, Layer::Active],
            (Presentation::Inline, true) => vec![Layer::Active],
        }
    }

    pub fn current_time(&self) -> ClockReading {
        self.zone.clock_reading(self.live_clock.current())
    }

    /// `None` until activated
    pub fn expiry_label(&self) -> Option<String> {
        self.session
            .activation_instant()
            .map(|at| self.zone.expiry_label(at, self.session.selected_pass()))
    }

    /// Apply one event. Returns true when the screen needs a redraw.
    pub fn on_event(&mut self, event: PassEvent) -> bool {
        match event {
            PassEvent::Tick(tick) => self.live_clock.on_tick(tick),
            PassEvent::Resize => true,
            PassEvent::Key(key) => self.on_key(key),
            PassEvent::InputClosed => {
                warn!("terminal input closed, quitting");
                self.quit();
                true
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return true;
        }

        if self.session.is_activated() {
            match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('x') => self.reset(),
                KeyCode::Char('q') => self.quit(),
                _ => {
                    debug!(key = ?key.code, "ignored on active pass");
                    return false;
                }
            }
            return true;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(c @ '1'..='9') => self.select_nth(c as usize - '1' as usize),
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char(' ') => {
                self.activate();
                true
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.quit();
                true
            }
            _ => false,
        }
    }
}
