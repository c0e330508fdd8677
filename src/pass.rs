use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A fare tier that can be activated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, strum_macros::Display, Serialize,
    Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum PassType {
    #[default]
    #[value(name = "4-hour")]
    #[strum(serialize = "4 Hour")]
    FourHour,
    #[value(name = "24-hour")]
    #[strum(serialize = "24 Hour")]
    TwentyFourHour,
    #[value(name = "7-day")]
    #[strum(serialize = "7 Day")]
    SevenDay,
    #[value(name = "31-day")]
    #[strum(serialize = "31 Day")]
    ThirtyOneDay,
}

impl PassType {
    pub const ALL: [PassType; 4] = [
        PassType::FourHour,
        PassType::TwentyFourHour,
        PassType::SevenDay,
        PassType::ThirtyOneDay,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PassType::FourHour => "4-hour",
            PassType::TwentyFourHour => "24-hour",
            PassType::SevenDay => "7-day",
            PassType::ThirtyOneDay => "31-day",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PassType::FourHour => "4 Hour",
            PassType::TwentyFourHour => "24 Hour",
            PassType::SevenDay => "7 Day",
            PassType::ThirtyOneDay => "31 Day",
        }
    }

    /// Human readable validity window, e.g. "7 days"
    pub fn duration_label(&self) -> &'static str {
        match self {
            PassType::FourHour => "4 hours",
            PassType::TwentyFourHour => "24 hours",
            PassType::SevenDay => "7 days",
            PassType::ThirtyOneDay => "31 days",
        }
    }

    pub fn price_label(&self) -> &'static str {
        match self {
            PassType::FourHour => "$2.00",
            PassType::TwentyFourHour => "$5.00",
            PassType::SevenDay => "$22.00",
            PassType::ThirtyOneDay => "$70.00",
        }
    }

    pub fn duration_hours(&self) -> u32 {
        match self {
            PassType::FourHour => 4,
            PassType::TwentyFourHour => 24,
            PassType::SevenDay => 24 * 7,
            PassType::ThirtyOneDay => 24 * 31,
        }
    }

    /// Resolve a display name ("24 Hour") or id ("24-hour").
    /// Anything unrecognized resolves to the 4 hour pass.
    pub fn lookup(name: &str) -> PassType {
        let needle = name.trim();
        PassType::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle) || p.id().eq_ignore_ascii_case(needle))
            .unwrap_or_default()
    }
}

/// Duration in hours for a pass referenced by name or id
pub fn duration_hours_for(name: Option<&str>) -> u32 {
    name.map(PassType::lookup).unwrap_or_default().duration_hours()
}

impl From<String> for PassType {
    fn from(s: String) -> Self {
        PassType::lookup(&s)
    }
}

impl From<PassType> for String {
    fn from(p: PassType) -> Self {
        p.id().to_string()
    }
}

/// The set of passes offered on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassCatalog {
    /// every fare tier
    #[default]
    Full,
    /// a single fixed 4 hour fare, no selection list
    Single,
}

impl PassCatalog {
    pub fn offered(&self) -> &'static [PassType] {
        match self {
            PassCatalog::Full => &PassType::ALL,
            PassCatalog::Single => &PassType::ALL[..1],
        }
    }

    pub fn offers(&self, pass: PassType) -> bool {
        self.offered().contains(&pass)
    }

    pub fn has_choice(&self) -> bool {
        self.offered().len() > 1
    }

    /// Configured default if offered, otherwise the first offered pass
    pub fn resolve_default(&self, preferred: PassType) -> PassType {
        if self.offers(preferred) {
            preferred
        } else {
            self.offered()[0]
        }
    }

    pub fn position(&self, pass: PassType) -> Option<usize> {
        self.offered().iter().position(|p| *p == pass)
    }
}
