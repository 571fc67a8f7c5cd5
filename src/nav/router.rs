// SPDX-License-Identifier: MPL-2.0

use crate::nav::history::History;
use crate::nav::route::Route;
use serde_json::Value;
use tracing::{debug, warn};

/// Permission to render one navigation's response.
///
/// Only the most recently issued ticket can be accepted, so a slow response
/// for a view the user already left is dropped instead of replacing the
/// newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    route: Route,
    push: bool,
}

impl Ticket {
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Whether accepting this ticket adds a history entry.
    pub fn pushes_history(&self) -> bool {
        self.push
    }
}

/// Tracks the current route and keeps history in step with it.
pub struct Router<H: History> {
    history: H,
    issued: u64,
    current: Option<Route>,
}

impl<H: History> Router<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            issued: 0,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Start a user-initiated navigation; it is pushed onto history once
    /// its content arrives.
    pub fn begin(&mut self, route: Route) -> Ticket {
        self.issue(route, true)
    }

    /// Start replaying a route reached through back/forward.
    pub fn begin_replay(&mut self, route: Route) -> Ticket {
        self.issue(route, false)
    }

    /// Turn a popstate into a replay. Entries without state (the one the
    /// session started on) and unreadable entries do nothing.
    pub fn on_popstate(&mut self, state: Option<&Value>) -> Option<Ticket> {
        let state = state?;
        match Route::from_state(state) {
            Ok(route) => Some(self.begin_replay(route)),
            Err(e) => {
                warn!(error = %e, "ignoring history entry");
                None
            }
        }
    }

    fn issue(&mut self, route: Route, push: bool) -> Ticket {
        self.issued += 1;
        debug!(seq = self.issued, path = %route.path(), push, "navigation started");
        Ticket {
            seq: self.issued,
            route,
            push,
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.issued
    }

    /// Commit a navigation whose content has been fetched. Returns false
    /// when a newer navigation has started since.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_latest(&ticket) {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                path = %ticket.route.path(),
                "dropping stale navigation"
            );
            return false;
        }
        if ticket.push {
            self.history
                .push_state(ticket.route.to_state(), &ticket.route.path());
        }
        self.current = Some(ticket.route);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::history::SessionHistory;
    use serde_json::json;

    fn router() -> Router<SessionHistory> {
        Router::new(SessionHistory::new("/"))
    }

    #[test]
    fn test_accept_pushes_entry() {
        let mut router = router();
        let ticket = router.begin(Route::profile("alice", 2).unwrap());
        assert!(router.accept(ticket));
        assert_eq!(router.history().len(), 2);
        assert_eq!(router.history().current().url, "/profile/alice?page=2");
        assert_eq!(
            router.history().current().state,
            Some(json!({"view": "profile", "username": "alice", "page": 2}))
        );
        assert_eq!(router.current(), Some(&Route::profile("alice", 2).unwrap()));
    }

    #[test]
    fn test_replay_does_not_push() {
        let mut router = router();
        let state = json!({"view": "profile", "username": "alice", "page": 2});
        let ticket = router.on_popstate(Some(&state)).unwrap();
        assert!(!ticket.pushes_history());
        assert!(router.accept(ticket));
        assert_eq!(router.history().len(), 1);
        assert_eq!(router.current(), Some(&Route::profile("alice", 2).unwrap()));
    }

    #[test]
    fn test_popstate_without_state_is_ignored() {
        let mut router = router();
        assert!(router.on_popstate(None).is_none());
        assert!(router.on_popstate(Some(&json!({"page": 1}))).is_none());
        assert!(router.current().is_none());
    }

    #[test]
    fn test_stale_ticket_is_dropped() {
        let mut router = router();
        let slow = router.begin(Route::feed(1));
        let fast = router.begin(Route::following(1));

        assert!(router.accept(fast));
        assert!(!router.accept(slow));
        assert_eq!(router.current(), Some(&Route::following(1)));
        assert_eq!(router.history().len(), 2);
    }
}
