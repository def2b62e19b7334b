use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Timelike, Utc};

pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Maps instants onto the venue's wall clock. Days are closed ranges
/// `[00:00:00.000, 23:59:59.999]` in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueCalendar {
    offset: FixedOffset,
}

impl Default for VenueCalendar {
    fn default() -> Self {
        Self::from_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES).unwrap_or_else(Self::utc)
    }
}

impl VenueCalendar {
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn local_hour(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.offset).hour()
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// `None` when the day's edges fall outside the representable range.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc = local_midnight
            .checked_sub_signed(TimeDelta::seconds(self.offset.local_minus_utc() as i64))?;
        Some(utc.and_utc())
    }

    pub fn end_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.start_of_day(date)?
            .checked_add_signed(TimeDelta::days(1) - TimeDelta::milliseconds(1))
    }

    pub fn day_bounds(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.range_bounds(date, date)
    }

    pub fn range_bounds(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_of_day(first)?, self.end_of_day(last)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist() -> VenueCalendar {
        VenueCalendar::from_offset_minutes(330).unwrap()
    }

    #[test]
    fn test_day_bounds_in_venue_time() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let (start, end) = ist().day_bounds(date).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-13T18:30:00+00:00");
        assert_eq!(
            end.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2025-03-14T18:29:59.999Z"
        );
    }

    #[test]
    fn test_local_date_and_hour() {
        let instant = DateTime::parse_from_rfc3339("2025-03-14T20:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            ist().local_date(instant),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(ist().local_hour(instant), 1);
        assert_eq!(VenueCalendar::utc().local_hour(instant), 20);
    }

    #[test]
    fn test_bounds_at_the_edge_of_time() {
        assert!(ist().day_bounds(NaiveDate::MIN).is_none());
        assert!(ist().day_bounds(NaiveDate::MAX).is_some());
        let west = VenueCalendar::from_offset_minutes(-300).unwrap();
        assert!(west.day_bounds(NaiveDate::MAX).is_none());
        assert!(
            ist()
                .range_bounds(NaiveDate::MIN, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_invalid_offset() {
        assert!(VenueCalendar::from_offset_minutes(24 * 60).is_none());
        assert!(VenueCalendar::from_offset_minutes(-300).is_some());
    }
}
