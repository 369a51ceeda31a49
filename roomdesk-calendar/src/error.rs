/// Errors raised while interpreting calendar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The input is neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    InvalidDate(String),
    /// An event ends at or before its start.
    InvalidRange,
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::InvalidDate(input) => write!(f, "Invalid date: '{input}'"),
            CalendarError::InvalidRange => write!(f, "Event end must be after its start"),
        }
    }
}

impl std::error::Error for CalendarError {}

roomdesk_core::map_error! {
    CalendarError => BadRequest,
}
