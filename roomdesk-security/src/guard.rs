//! Request-level route guard for the administrative sections.
//!
//! Runs before any handler. Requests under a protected prefix are resolved
//! against the directory; anything but a `superadmin` is redirected to the
//! dashboard. Resolution failures count as unauthorized.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use crate::paths;
use crate::resolver::SessionResolver;
use crate::role::Role;
use crate::user::UserRecord;

/// Path prefixes reserved to [`GUARD_ROLE`].
pub const PROTECTED_PREFIXES: [&str; 2] = [paths::ROOM_MANAGEMENT, paths::USER_MANAGEMENT];

/// The only role allowed into protected paths.
pub const GUARD_ROLE: Role = Role::Superadmin;

/// Whether `path` is a protected prefix or lies below one.
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Outcome of the guard policy for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(&'static str),
}

/// Apply the guard policy to a path and its resolved session.
pub fn evaluate(path: &str, user: Option<&UserRecord>) -> GuardDecision {
    if !is_protected(path) {
        return GuardDecision::Pass;
    }
    match user {
        Some(user) if user.has_role(GUARD_ROLE) => GuardDecision::Pass,
        _ => GuardDecision::Redirect(paths::DASHBOARD),
    }
}

/// Axum middleware enforcing the guard.
///
/// Install with `axum::middleware::from_fn_with_state(resolver, route_guard)`.
/// On pass-through of a protected path the resolved [`UserRecord`] is added
/// to the request extensions.
pub async fn route_guard(
    State(resolver): State<Arc<SessionResolver>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if !is_protected(&path) {
        return next.run(req).await;
    }

    let user = resolver.resolve_jar(&jar).await;
    match evaluate(&path, user.as_ref()) {
        GuardDecision::Pass => {
            debug!(%path, "Route guard passed");
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        GuardDecision::Redirect(target) => {
            info!(
                %path,
                role = user.as_ref().map(|u| u.role.as_str()).unwrap_or("none"),
                "Route guard redirect"
            );
            Redirect::temporary(target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_themselves_and_subpaths_only() {
        assert!(is_protected("/room-management"));
        assert!(is_protected("/room-management/"));
        assert!(is_protected("/room-management/42/edit"));
        assert!(is_protected("/user-management/new"));
        assert!(!is_protected("/room-managementx"));
        assert!(!is_protected("/rooms"));
        assert!(!is_protected("/"));
        assert!(!is_protected("/dashboard/room-management"));
    }
}
