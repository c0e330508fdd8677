use std::fmt::Display;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};

use crate::pass::PassType;

/// Longest stretch we walk back looking for the offset in force before a
/// skipped wall-clock interval. Real-world gaps are at most a day.
const MAX_GAP_HOURS: i64 = 48;

/// Instant at which a pass activated at `activation` stops being valid.
///
/// The validity window is added to the wall clock of `activation`'s zone, so
/// a 4 hour pass activated at 1:30 AM expires at 5:30 AM even when the clocks
/// spring forward in between.
pub fn expiry<Tz: TimeZone>(activation: &DateTime<Tz>, pass: PassType) -> DateTime<Tz> {
    add_wall_clock_hours(activation, pass.duration_hours())
}

/// Add whole hours to the local wall-clock time and resolve the result back
/// into the same zone.
///
/// A wall time skipped by a spring-forward transition is pushed forward by the
/// length of the gap. A wall time repeated by a fall-back transition resolves
/// to the earlier of the two instants.
pub fn add_wall_clock_hours<Tz: TimeZone>(start: &DateTime<Tz>, hours: u32) -> DateTime<Tz> {
    let tz = start.timezone();
    let wall = start.naive_local() + TimeDelta::hours(i64::from(hours));
    resolve_wall_time(&tz, wall)
}

fn resolve_wall_time<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // interpret the missing wall time with the offset that was in
            // force before the gap
            let before = (1..=MAX_GAP_HOURS).find_map(|h| {
                tz.offset_from_local_datetime(&(wall - TimeDelta::hours(h)))
                    .earliest()
            });
            let utc = match before {
                Some(offset) => {
                    wall - TimeDelta::seconds(i64::from(offset.fix().local_minus_utc()))
                }
                None => wall,
            };
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Current time split the way the large clock shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// `h:mm:ss`
    pub time: String,
    /// `AM` / `PM`
    pub period: String,
}

impl std::fmt::Display for ClockReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.time, self.period)
    }
}

pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> ClockReading
where
    Tz::Offset: Display,
{
    ClockReading {
        time: at.format("%-I:%M:%S").to_string(),
        period: at.format("%p").to_string(),
    }
}

/// `Jan 16, 2024 at 10:00 AM`
pub fn format_expiry<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{} at {}",
        at.format("%b %-d, %Y"),
        at.format("%-I:%M %p")
    )
}
