use chrono::{FixedOffset, NaiveDate};
use roomdesk_calendar::{CalendarError, DateValidator, PAST_DATE_MESSAGE};

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[test]
fn past_dates_are_rejected() {
    let validator = DateValidator::default();
    assert_eq!(validator.check_against("2025-05-31", june_first()), Ok(false));
    assert_eq!(validator.check_against("2025-06-01", june_first()), Ok(true));
    assert_eq!(validator.check_against("2025-06-02", june_first()), Ok(true));
}

#[test]
fn timestamps_use_the_configured_offset() {
    let santiago = DateValidator::from_offset_minutes(-240).unwrap();
    assert_eq!(santiago.offset(), FixedOffset::west_opt(4 * 3600).unwrap());

    // 01:00 UTC on June 1st is still May 31st in UTC-4.
    assert_eq!(santiago.check_against("2025-06-01T01:00:00Z", june_first()), Ok(false));
    assert_eq!(santiago.check_against("2025-06-01T05:00:00Z", june_first()), Ok(true));
    assert_eq!(
        DateValidator::default().check_against("2025-06-01T01:00:00Z", june_first()),
        Ok(true)
    );
}

#[test]
fn today_is_always_valid() {
    let validator = DateValidator::from_offset_minutes(120).unwrap();
    let today = validator.today().format("%Y-%m-%d").to_string();
    assert_eq!(validator.check(&today), Ok(true));
}

#[test]
fn unparsable_input_is_an_error() {
    let err = DateValidator::default().check_against("31-05-2025", june_first()).unwrap_err();
    assert_eq!(err, CalendarError::InvalidDate("31-05-2025".into()));
    assert_eq!(err.to_string(), "Invalid date: '31-05-2025'");
}

#[test]
fn rejection_message() {
    assert_eq!(PAST_DATE_MESSAGE, "You cannot select a past date");
}
