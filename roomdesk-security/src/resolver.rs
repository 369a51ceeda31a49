use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, warn};

use crate::cookies;
use crate::directory::{UserDirectory, UserDirectoryErased};
use crate::paths;
use crate::token::normalize_identity_token;
use crate::user::UserRecord;

/// Turns a raw SSO identity token into a resolved user, or nothing.
///
/// Missing tokens, unknown users and directory failures all resolve to
/// `None`. The distinction is logged for operators and never returned.
/// Every call performs exactly one directory lookup (plus the optional
/// probe); nothing is cached or retried.
pub struct SessionResolver {
    directory: Arc<dyn UserDirectoryErased>,
    probe_on_resolve: bool,
}

impl SessionResolver {
    pub fn new<D: UserDirectory>(directory: D) -> Self {
        Self {
            directory: Arc::new(directory),
            probe_on_resolve: false,
        }
    }

    /// Run the directory connectivity probe before each resolution.
    pub fn with_probe(mut self, enabled: bool) -> Self {
        self.probe_on_resolve = enabled;
        self
    }

    /// Resolve a raw identity token.
    pub async fn resolve(&self, token: Option<&str>) -> Option<UserRecord> {
        if self.probe_on_resolve {
            match self.directory.probe().await {
                Ok(()) => debug!("Directory probe succeeded"),
                Err(e) => warn!(error = %e, "Directory probe failed"),
            }
        }

        let Some(key) = token.and_then(normalize_identity_token) else {
            debug!("No identity token present");
            return None;
        };

        match self.directory.find_active(&key).await {
            Ok(Some(user)) => {
                debug!(user_id = %user.id, role = %user.role, "Session resolved");
                Some(user)
            }
            Ok(None) => {
                info!("No active user matches the identity token");
                None
            }
            Err(e) => {
                warn!(error = %e, "User lookup failed, treating request as unauthenticated");
                None
            }
        }
    }

    /// Resolve the identity token carried by the request cookies.
    pub async fn resolve_jar(&self, jar: &CookieJar) -> Option<UserRecord> {
        let token = cookies::identity_token(jar);
        self.resolve(token.as_deref()).await
    }
}

/// What the caller should do after a resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(&'static str),
}

/// Navigation policy for a resolved session: no user means "go to login".
pub fn decide_navigation(user: Option<&UserRecord>) -> Navigation {
    match user {
        Some(_) => Navigation::Stay,
        None => Navigation::Redirect(paths::LOGIN),
    }
}
