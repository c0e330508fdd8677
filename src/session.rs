use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::pass::{PassCatalog, PassType};

/// In-memory view state for one pass.
///
/// The activation instant doubles as the activated flag, so a session can
/// never be "activated" without knowing when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    catalog: PassCatalog,
    activated_at: Option<DateTime<Utc>>,
    selected: PassType,
}

impl Session {
    pub fn new(catalog: PassCatalog, preferred: PassType) -> Self {
        Self {
            catalog,
            activated_at: None,
            selected: catalog.resolve_default(preferred),
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated_at.is_some()
    }

    pub fn activation_instant(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    pub fn selected_pass(&self) -> PassType {
        self.selected
    }

    pub fn catalog(&self) -> PassCatalog {
        self.catalog
    }

    /// Start (or restart) the validity window at `now`
    pub fn activate(&mut self, now: DateTime<Utc>) {
        info!(pass = %self.selected, at = %now, "activated");
        self.activated_at = Some(now);
    }

    pub fn reset(&mut self) {
        if self.activated_at.take().is_some() {
            info!(pass = %self.selected, "reset");
        }
    }

    /// Change the selected pass. Ignored while activated or when the catalog
    /// does not offer `pass`. Returns whether the selection changed.
    pub fn select_pass_type(&mut self, pass: PassType) -> bool {
        if self.is_activated() || !self.catalog.offers(pass) {
            debug!(pass = %pass, "selection ignored");
            return false;
        }
        let changed = self.selected != pass;
        self.selected = pass;
        if changed {
            info!(pass = %pass, "pass_selected");
        }
        changed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PassCatalog::default(), PassType::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, 0, 0).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let s = Session::default();
        assert!(!s.is_activated());
        assert_eq!(s.activation_instant(), None);
        assert_eq!(s.selected_pass(), PassType::FourHour);
    }

    #[test]
    fn test_activate_sets_instant() {
        let mut s = Session::default();
        s.activate(at(10));
        assert!(s.is_activated());
        assert_eq!(s.activation_instant(), Some(at(10)));
    }

    #[test]
    fn test_reactivate_moves_clock_reference() {
        let mut s = Session::default();
        s.activate(at(10));
        s.activate(at(11));
        assert_eq!(s.activation_instant(), Some(at(11)));
    }

    #[test]
    fn test_activate_then_reset_restores_initial_shape() {
        let mut s = Session::default();
        s.select_pass_type(PassType::SevenDay);
        let before = s.clone();
        s.activate(at(10));
        s.reset();
        assert_eq!(s, before);
        assert_eq!(s.selected_pass(), PassType::SevenDay);
    }

    #[test]
    fn test_reset_when_inactive_is_noop() {
        let mut s = Session::default();
        let before = s.clone();
        s.reset();
        assert_eq!(s, before);
    }

    #[test]
    fn test_selection_locked_while_activated() {
        let mut s = Session::default();
        s.select_pass_type(PassType::TwentyFourHour);
        s.activate(at(10));
        assert!(!s.select_pass_type(PassType::ThirtyOneDay));
        assert_eq!(s.selected_pass(), PassType::TwentyFourHour);
    }

    #[test]
    fn test_single_catalog_rejects_other_passes() {
        let mut s = Session::new(PassCatalog::Single, PassType::SevenDay);
        assert_eq!(s.selected_pass(), PassType::FourHour);
        assert!(!s.select_pass_type(PassType::SevenDay));
        assert_eq!(s.selected_pass(), PassType::FourHour);
    }

    #[test]
    fn test_select_reports_change() {
        let mut s = Session::default();
        assert!(s.select_pass_type(PassType::SevenDay));
        assert!(!s.select_pass_type(PassType::SevenDay));
    }
}
