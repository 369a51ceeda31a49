//! Role-gated layout.
//!
//! A softer, UX-only redirect layered over page rendering. The route guard
//! remains the authority for the admin sections.

use std::sync::Arc;

use crate::paths;
use crate::resolver::SessionResolver;
use crate::state::{Session, SessionState};

/// What the layout should show for the current (session, path) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutView {
    /// The login page renders its children unconditionally.
    Bypass,
    /// Resolution still running; show the placeholder.
    Loading,
    /// Navigate elsewhere.
    Redirect(&'static str),
    /// Render the protected subtree.
    Render,
}

/// Layout policy, re-evaluated whenever user, loading or path change.
pub fn layout_view(session: &Session, path: &str) -> LayoutView {
    if path == paths::LOGIN {
        return LayoutView::Bypass;
    }
    if session.loading {
        return LayoutView::Loading;
    }
    match &session.user {
        Some(user) if path == paths::ROOT && !user.role.is_privileged() => {
            LayoutView::Redirect(paths::MY_RESERVATIONS)
        }
        _ => LayoutView::Render,
    }
}

/// A mounted layout: owns its session state and re-derives it on navigation.
pub struct RoleGatedLayout {
    resolver: Arc<SessionResolver>,
    state: SessionState,
}

impl RoleGatedLayout {
    pub fn new(resolver: Arc<SessionResolver>) -> Self {
        Self {
            resolver,
            state: SessionState::new(),
        }
    }

    /// Current view for `path` without resolving again.
    pub fn view(&self, path: &str) -> LayoutView {
        layout_view(&self.state.current(), path)
    }

    pub fn session(&self) -> Session {
        self.state.current()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Navigate to `path`: resolve the session, then evaluate the layout.
    ///
    /// The login path bypasses resolution entirely.
    pub async fn navigate(&self, token: Option<&str>, path: &str) -> LayoutView {
        if path == paths::LOGIN {
            return LayoutView::Bypass;
        }
        let session = self.state.refresh(&self.resolver, token).await;
        layout_view(&session, path)
    }
}
