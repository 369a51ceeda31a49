//! Layout-gated pages.
//!
//! Every page re-derives the session from the identity cookie. No session
//! sends the visitor to `/login`; a non-privileged user landing on `/` is
//! sent to `/my-reservations`.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use roomdesk_security::paths;
use roomdesk_security::{cookies, decide_navigation, LayoutView, Navigation, RoleGatedLayout};
use tracing::debug;

use crate::models::PageView;
use crate::state::AppState;

pub async fn login() -> Json<PageView> {
    Json(PageView {
        page: "login",
        loading: false,
        user: None,
    })
}

pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Response {
    render(&state, &jar, paths::ROOT, "home").await
}

pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    render(&state, &jar, paths::DASHBOARD, "dashboard").await
}

pub async fn my_reservations(State(state): State<AppState>, jar: CookieJar) -> Response {
    render(&state, &jar, paths::MY_RESERVATIONS, "my-reservations").await
}

async fn render(state: &AppState, jar: &CookieJar, path: &str, page: &'static str) -> Response {
    let layout = RoleGatedLayout::new(state.resolver.clone());
    let token = cookies::identity_token(jar);
    let view = layout.navigate(token.as_deref(), path).await;
    let session = layout.session();

    if let Navigation::Redirect(target) = decide_navigation(session.user.as_ref()) {
        debug!(%path, %target, "No session, redirecting");
        return Redirect::temporary(target).into_response();
    }

    match view {
        LayoutView::Redirect(target) => {
            debug!(%path, %target, "Layout redirect");
            Redirect::temporary(target).into_response()
        }
        // The layout is per request and its only attempt has settled, so
        // `Loading` does not occur here.
        LayoutView::Loading | LayoutView::Bypass | LayoutView::Render => Json(PageView {
            page,
            loading: session.loading,
            user: session.user,
        })
        .into_response(),
    }
}
