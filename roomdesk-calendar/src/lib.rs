pub mod date;
pub mod error;
pub mod ics;

pub use date::{
    is_valid_date, parse_calendar_date, parse_timestamp, today_in, DateValidator,
    PAST_DATE_MESSAGE,
};
pub use error::CalendarError;
pub use ics::{sanitize_filename, IcsAttachment, IcsEvent};
