//! Past-date validation for reservation forms.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::CalendarError;

/// Message shown when a reservation date lies in the past.
pub const PAST_DATE_MESSAGE: &str = "You cannot select a past date";

/// `true` iff `date` is today or later. Only calendar dates are compared.
pub fn is_valid_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp projected into `offset`.
pub fn parse_calendar_date(input: &str, offset: FixedOffset) -> Result<NaiveDate, CalendarError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.with_timezone(&offset).date_naive())
        .map_err(|_| CalendarError::InvalidDate(input.to_string()))
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, CalendarError> {
    let input = input.trim();
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| CalendarError::InvalidDate(input.to_string()))
}

/// The current calendar date at `offset`.
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Date check bound to the portal's UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct DateValidator {
    offset: FixedOffset,
}

impl DateValidator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.offset)
    }

    /// Validate `input` against today's date.
    pub fn check(&self, input: &str) -> Result<bool, CalendarError> {
        self.check_against(input, self.today())
    }

    /// Validate `input` against an explicit `today`.
    pub fn check_against(&self, input: &str, today: NaiveDate) -> Result<bool, CalendarError> {
        let date = parse_calendar_date(input, self.offset)?;
        Ok(is_valid_date(date, today))
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}
