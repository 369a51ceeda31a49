use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::CookieJar;
use roomdesk_core::HttpError;
use roomdesk_security::{cookies, paths};
use tracing::info;

use crate::models::SsoCallback;
use crate::state::AppState;

/// Landing point of the external SSO redirect.
pub async fn sso_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(callback): Query<SsoCallback>,
) -> Result<impl IntoResponse, HttpError> {
    let token = callback.token.trim();
    if token.is_empty() {
        return Err(HttpError::BadRequest("Missing identity token".into()));
    }
    info!("SSO session established");
    let jar = cookies::establish_sso_session(jar, token, state.cookie_max_age);
    Ok((jar, Redirect::temporary(paths::ROOT)))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("SSO session cleared");
    (cookies::clear_sso_session(jar), Redirect::temporary(paths::LOGIN))
}
