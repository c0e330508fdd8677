use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::expiry::{self, ClockReading};
use crate::pass::PassType;

/// Time zone the pass is displayed and computed in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Zone {
    /// whatever the host reports
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolve an IANA zone name. Unknown names fall back to the local zone.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Zone::Local,
            Some(n) => match n.parse::<Tz>() {
                Ok(tz) => Zone::Named(tz),
                Err(_) => {
                    warn!(timezone = %n, "unknown timezone, using local");
                    Zone::Local
                }
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            Zone::Local => "local".to_string(),
            Zone::Named(tz) => tz.name().to_string(),
        }
    }

    pub fn localize(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => at.with_timezone(&Local).fixed_offset(),
            Zone::Named(tz) => at.with_timezone(tz).fixed_offset(),
        }
    }

    /// Wall-clock local date-time as an instant in this zone
    pub fn at_local(&self, wall: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => Local
                .from_local_datetime(&wall)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
            Zone::Named(tz) => tz
                .from_local_datetime(&wall)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
        }
    }

    /// Expiry computed against this zone's wall clock
    pub fn expiry(&self, activation: DateTime<Utc>, pass: PassType) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => expiry::expiry(&activation.with_timezone(&Local), pass).fixed_offset(),
            Zone::Named(tz) => expiry::expiry(&activation.with_timezone(tz), pass).fixed_offset(),
        }
    }

    pub fn clock_reading(&self, at: DateTime<Utc>) -> ClockReading {
        expiry::format_clock(&self.localize(at))
    }

    pub fn expiry_label(&self, activation: DateTime<Utc>, pass: PassType) -> String {
        expiry::format_expiry(&self.expiry(activation, pass))
    }
}
