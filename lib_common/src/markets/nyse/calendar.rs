//! # NYSE Market Calendar Gate
//!
//! Decides whether the market is currently open: weekday, not a listed
//! holiday, and inside the configured intraday window. The decision is a
//! pure function of an instant plus the static holiday set, so the same
//! instant always yields the same answer.
//!
//! All civil-time math runs in the exchange's IANA zone via `chrono-tz`;
//! standard/daylight offsets are handled by the zone-aware conversion, never
//! by a fixed UTC offset.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::configs::config_alerter::{AlerterConfig, ConfigError};

/// Immutable set of full-day market closures.
///
/// Dates are civil dates in the exchange's local zone. The set is fixed for
/// the lifetime of the process and is refreshed externally (via config) for
/// each new calendar year.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Service answering "is the market open right now?".
pub struct MarketCalendarGate {
    zone: Tz,
    open_minute: u32,
    close_minute: u32,
    holidays: HolidayCalendar,
}

impl MarketCalendarGate {
    pub fn new(zone: Tz, open_minute: u32, close_minute: u32, holidays: HolidayCalendar) -> Self {
        Self {
            zone,
            open_minute,
            close_minute,
            holidays,
        }
    }

    /// Builds the gate from the resolved configuration.
    pub fn from_config(config: &AlerterConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.timezone()?,
            config.market_open_minute,
            config.market_close_minute,
            HolidayCalendar::new(config.holiday_set()),
        ))
    }

    /// Whether the market is open at `instant`.
    ///
    /// 1. Convert the instant to exchange-local civil time.
    /// 2. Saturday/Sunday: closed, regardless of time or holiday membership.
    /// 3. Local civil date in the holiday set: closed for the whole day.
    /// 4. Otherwise open exactly when minutes-since-local-midnight fall in
    ///    the inclusive window [open_minute, close_minute].
    pub fn is_open_at(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.zone);

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }

        if self.holidays.contains(local.date_naive()) {
            return false;
        }

        let minutes = local.hour() * 60 + local.minute();
        minutes >= self.open_minute && minutes <= self.close_minute
    }

    /// Whether the market is open at this wall-clock moment.
    pub fn is_open_now(&self) -> bool {
        self.is_open_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn gate() -> MarketCalendarGate {
        MarketCalendarGate::from_config(&AlerterConfig::default()).expect("default gate")
    }

    /// Builds the UTC instant for a New York local civil time.
    fn ny(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("unambiguous New York local time")
            .with_timezone(&Utc)
    }

    #[test]
    fn weekday_mid_session_is_open() {
        // Wednesday 2025-06-04, 10:30 local.
        assert!(gate().is_open_at(ny(2025, 6, 4, 10, 30)));
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let gate = gate();
        assert!(!gate.is_open_at(ny(2025, 6, 4, 9, 44)));
        assert!(gate.is_open_at(ny(2025, 6, 4, 9, 45)));
        assert!(gate.is_open_at(ny(2025, 6, 4, 16, 0)));
        assert!(!gate.is_open_at(ny(2025, 6, 4, 16, 1)));
    }

    #[test]
    fn weekend_is_closed_regardless_of_time() {
        let gate = gate();
        // Saturday and Sunday, both squarely inside the weekday window.
        assert!(!gate.is_open_at(ny(2025, 6, 7, 12, 0)));
        assert!(!gate.is_open_at(ny(2025, 6, 8, 12, 0)));
    }

    #[test]
    fn listed_holidays_are_closed_all_day() {
        let gate = gate();
        // Independence Day 2025 falls on a Friday.
        assert!(!gate.is_open_at(ny(2025, 7, 4, 10, 0)));
        assert!(!gate.is_open_at(ny(2025, 7, 4, 15, 59)));
        // The adjacent trading days are unaffected.
        assert!(gate.is_open_at(ny(2025, 7, 3, 10, 0)));
        assert!(gate.is_open_at(ny(2025, 7, 7, 10, 0)));
    }

    #[test]
    fn conversion_is_zone_aware_across_dst() {
        let gate = gate();
        // 14:30 UTC is 09:30 in New York during winter (closed, before the
        // window) but 10:30 during summer daylight time (open).
        let winter = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2025, 7, 15, 14, 30, 0).unwrap();
        assert!(!gate.is_open_at(winter));
        assert!(gate.is_open_at(summer));
    }

    #[test]
    fn decision_is_idempotent_for_the_same_instant() {
        let gate = gate();
        let instant = ny(2025, 6, 4, 11, 0);
        assert_eq!(gate.is_open_at(instant), gate.is_open_at(instant));
        let closed = ny(2025, 6, 7, 11, 0);
        assert_eq!(gate.is_open_at(closed), gate.is_open_at(closed));
    }

    #[test]
    fn holiday_calendar_deduplicates_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let calendar = HolidayCalendar::new([date, date]);
        assert_eq!(calendar.len(), 1);
        assert!(calendar.contains(date));
    }
}
