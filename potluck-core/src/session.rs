//! Client-side view of the signed-in user.

use tokio::sync::watch;

use crate::types::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The session has not been resolved yet.
    #[default]
    Loading,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Holds the current [`SessionState`] and notifies subscribers on change.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::Loading);
        SessionStore { tx }
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Record the outcome of a session lookup.
    pub fn resolve(&self, identity: Option<Identity>) {
        self.set(match identity {
            Some(identity) => SessionState::Authenticated(identity),
            None => SessionState::Anonymous,
        });
    }

    pub fn sign_out(&self) {
        self.set(SessionState::Anonymous);
    }

    fn set(&self, state: SessionState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ada() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: None,
        }
    }

    #[test]
    fn test_starts_loading() {
        let store = SessionStore::new();
        assert_eq!(store.state(), SessionState::Loading);
        assert_eq!(store.state().identity(), None);
    }

    #[test]
    fn test_resolve_and_sign_out() {
        let store = SessionStore::new();
        let user = ada();
        store.resolve(Some(user.clone()));
        assert_eq!(store.state().identity(), Some(&user));

        store.sign_out();
        assert_eq!(store.state(), SessionState::Anonymous);

        store.resolve(None);
        assert_eq!(store.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.resolve(Some(ada()));
        rx.changed().await.unwrap();
        assert!(matches!(*rx.borrow(), SessionState::Authenticated(_)));

        // Re-sending the same state is not a change.
        store.sign_out();
        rx.changed().await.unwrap();
        store.sign_out();
        assert!(!rx.has_changed().unwrap());
    }
}
