use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use roomdesk_core::{catch_panic_layer, default_trace, no_store};
use roomdesk_security::route_guard;

use crate::controllers::{admin, api, auth, health, pages};
use crate::state::AppState;

/// Assemble the portal router.
///
/// Layers, outermost first: panic catcher, tracing, `Cache-Control: no-store`,
/// route guard.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/room-management", get(admin::room_management))
        .route("/room-management/", get(admin::room_management))
        .route("/room-management/{*rest}", get(admin::room_management))
        .route("/user-management", get(admin::user_management))
        .route("/user-management/", get(admin::user_management))
        .route("/user-management/{*rest}", get(admin::user_management));

    Router::new()
        .route("/health", get(health::health))
        .route("/login", get(pages::login))
        .route("/logout", get(auth::logout))
        .route("/auth/sso/callback", get(auth::sso_callback))
        .route("/", get(pages::home))
        .route("/dashboard", get(pages::dashboard))
        .route("/my-reservations", get(pages::my_reservations))
        .route("/api/session", get(api::session))
        .route("/api/calendar/validate", post(api::validate_date))
        .route("/api/reservations/ics", post(api::export_ics))
        .merge(admin)
        .layer(from_fn_with_state(state.resolver.clone(), route_guard))
        .layer(no_store())
        .layer(default_trace())
        .layer(catch_panic_layer())
        .with_state(state)
}
