use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::resolver::SessionResolver;
use crate::user::UserRecord;

/// A derived session: the resolved user plus whether resolution is still running.
///
/// `loading == false` means no attempt is in flight; the last completed one
/// (successful or not) produced `user`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub loading: bool,
}

impl Session {
    pub fn pending() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn resolved(user: Option<UserRecord>) -> Self {
        Self {
            user,
            loading: false,
        }
    }
}

/// Observable session holder owned by a single view.
///
/// Each [`refresh`](SessionState::refresh) is one resolution attempt. Attempts
/// are not deduplicated: the last one to complete wins. An abandoned attempt
/// (its future dropped midway) never completes, so it leaves the user
/// untouched. `loading` stays `true` while any attempt is in flight.
/// Observers subscribe through a `watch` channel; updates are published while
/// the state itself is alive, so nothing is written after the owning view
/// has gone.
pub struct SessionState {
    tx: watch::Sender<Session>,
    in_flight: AtomicUsize,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::pending());
        Self {
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Run one resolution attempt and publish its outcome.
    pub async fn refresh(&self, resolver: &SessionResolver, token: Option<&str>) -> Session {
        let attempt = self.begin();
        let user = resolver.resolve(token).await;
        attempt.complete(user)
    }

    fn begin(&self) -> Attempt<'_> {
        // The counter only moves under the channel's write lock.
        self.tx.send_modify(|session| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            session.loading = true;
        });
        Attempt {
            state: self,
            finished: false,
        }
    }

    /// Close one attempt. `Some(user)` publishes a completed result; `None`
    /// marks an abandoned attempt and keeps the current user.
    fn settle(&self, outcome: Option<Option<UserRecord>>) -> Session {
        let mut settled = Session::resolved(None);
        self.tx.send_if_modified(|session| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            let loading = remaining > 0;
            let mut changed = session.loading != loading;
            session.loading = loading;
            if let Some(user) = outcome {
                changed |= session.user != user;
                session.user = user;
            }
            settled = session.clone();
            changed
        });
        settled
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight resolution attempt. Settles exactly once.
struct Attempt<'a> {
    state: &'a SessionState,
    finished: bool,
}

impl Attempt<'_> {
    fn complete(mut self, user: Option<UserRecord>) -> Session {
        self.finished = true;
        self.state.settle(Some(user))
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("Session resolution abandoned before completion");
            self.state.settle(None);
        }
    }
}
