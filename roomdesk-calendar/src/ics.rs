//! iCalendar (RFC 5545) export of a single reservation.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::CalendarError;

const PRODID: &str = "-//roomdesk//Room Reservations//EN";
const UID_DOMAIN: &str = "roomdesk";
const ALARM_TRIGGERS: [&str; 3] = ["-PT1H", "-PT30M", "-PT10M"];
const MAX_LINE_OCTETS: usize = 75;
const MAX_FILENAME_CHARS: usize = 100;
const DEFAULT_FILENAME: &str = "reservation";

/// A single calendar event with display reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    pub location: Option<String>,
}

impl IcsEvent {
    /// Build an event; `end` must be strictly after `start`.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, CalendarError> {
        if end <= start {
            return Err(CalendarError::InvalidRange);
        }
        Ok(Self {
            summary: summary.into(),
            start,
            end,
            description: String::new(),
            location: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render with a fresh UID and the current time as `DTSTAMP`.
    pub fn render(&self) -> String {
        self.render_with(&Uuid::new_v4().to_string(), Utc::now())
    }

    /// Render with a fixed UID and stamp.
    pub fn render_with(&self, uid: &str, stamp: DateTime<Utc>) -> String {
        let mut doc = Document::default();
        doc.line("BEGIN:VCALENDAR");
        doc.line("VERSION:2.0");
        doc.line(&format!("PRODID:{PRODID}"));
        doc.line("CALSCALE:GREGORIAN");
        doc.line("METHOD:PUBLISH");
        doc.line("BEGIN:VEVENT");
        doc.line(&format!("UID:{uid}@{UID_DOMAIN}"));
        doc.line(&format!("DTSTAMP:{}", format_utc(stamp)));
        doc.line(&format!("DTSTART:{}", format_utc(self.start)));
        doc.line(&format!("DTEND:{}", format_utc(self.end)));
        doc.line(&format!("SUMMARY:{}", escape_text(&self.summary)));
        doc.line(&format!("DESCRIPTION:{}", escape_text(&self.description)));
        if let Some(location) = &self.location {
            doc.line(&format!("LOCATION:{}", escape_text(location)));
        }
        for trigger in ALARM_TRIGGERS {
            doc.line("BEGIN:VALARM");
            doc.line(&format!("TRIGGER:{trigger}"));
            doc.line("ACTION:DISPLAY");
            doc.line(&format!("DESCRIPTION:{}", escape_text(&format!("Reminder: {}", self.summary))));
            doc.line("END:VALARM");
        }
        doc.line("END:VEVENT");
        doc.line("END:VCALENDAR");
        doc.0
    }
}

#[derive(Default)]
struct Document(String);

impl Document {
    /// Append a content line, folded at 75 octets, terminated by CRLF.
    fn line(&mut self, content: &str) {
        let mut budget = MAX_LINE_OCTETS;
        let mut used = 0;
        for ch in content.chars() {
            if used + ch.len_utf8() > budget {
                self.0.push_str("\r\n ");
                // the leading space counts against the continuation line
                budget = MAX_LINE_OCTETS - 1;
                used = 0;
            }
            self.0.push(ch);
            used += ch.len_utf8();
        }
        self.0.push_str("\r\n");
    }
}

fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Reduce a user-supplied name to a safe `*.ics` filename.
pub fn sanitize_filename(name: &str) -> String {
    let trimmed = name.trim();
    let stem = match trimmed.len().checked_sub(4).and_then(|at| trimmed.get(at..).map(|ext| (at, ext))) {
        Some((at, ext)) if ext.eq_ignore_ascii_case(".ics") => &trimmed[..at],
        _ => trimmed,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(MAX_FILENAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        format!("{DEFAULT_FILENAME}.ics")
    } else {
        format!("{cleaned}.ics")
    }
}

/// Download response carrying a rendered calendar.
pub struct IcsAttachment {
    filename: String,
    body: String,
}

impl IcsAttachment {
    pub fn new(event: &IcsEvent, filename: &str) -> Self {
        Self::from_document(event.render(), filename)
    }

    pub fn from_document(body: String, filename: &str) -> Self {
        Self {
            filename: sanitize_filename(filename),
            body,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for IcsAttachment {
    fn into_response(self) -> Response {
        debug!(filename = %self.filename, bytes = self.body.len(), "Serving ICS attachment");
        let disposition = format!("attachment; filename=\"{}\"", self.filename);
        match HeaderValue::from_str(&disposition) {
            Ok(disposition) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/calendar; charset=utf-8")),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                self.body,
            )
                .into_response(),
            Err(_) => roomdesk_core::HttpError::Internal("Invalid attachment filename".into()).into_response(),
        }
    }
}
