use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use roomdesk_calendar::{parse_timestamp, IcsAttachment, IcsEvent, PAST_DATE_MESSAGE};
use roomdesk_core::HttpError;
use roomdesk_security::UserRecord;
use serde_json::{json, Value};

use crate::models::{DateCheck, IcsRequest};
use crate::state::AppState;

pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserRecord>, HttpError> {
    state
        .resolver
        .resolve_jar(&jar)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::Unauthorized("No active session".into()))
}

pub async fn validate_date(
    State(state): State<AppState>,
    Json(body): Json<DateCheck>,
) -> Result<Json<Value>, HttpError> {
    if state.dates.check(&body.date)? {
        Ok(Json(json!({ "valid": true })))
    } else {
        Err(HttpError::Unprocessable(PAST_DATE_MESSAGE.into()))
    }
}

pub async fn export_ics(Json(body): Json<IcsRequest>) -> Result<IcsAttachment, HttpError> {
    let start = parse_timestamp(&body.start)?;
    let end = parse_timestamp(&body.end)?;
    let mut event = IcsEvent::new(body.summary, start, end)?.with_description(body.description);
    if let Some(location) = body.location.filter(|l| !l.trim().is_empty()) {
        event = event.with_location(location);
    }
    Ok(IcsAttachment::new(&event, &body.filename))
}
