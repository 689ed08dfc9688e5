//! Session state management
//!
//! A client is unauthenticated until AUTH succeeds, authenticated until it
//! logs out, and closed for good once its correlator shuts down.

use std::fmt;

/// Session state of one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Only AUTH may be sent
    Unauthenticated,
    /// Every data command carries `s=<session>`
    Authenticated { session: String, username: String },
    /// The correlator has shut down
    Closed,
}

impl SessionState {
    /// Check if the session is authenticated
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// Check if the state is terminal
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    /// Get the session key if authenticated
    pub fn session(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Check a transition against the state machine rules
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Unauthenticated, Authenticated { .. }) => true,
            // Re-authenticating replaces the session
            (Authenticated { .. }, Authenticated { .. }) => true,
            (Authenticated { .. }, Unauthenticated) => true,
            (Unauthenticated | Authenticated { .. }, Closed) => true,
            (Closed, Closed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unauthenticated => write!(f, "Unauthenticated"),
            SessionState::Authenticated { username, .. } => {
                write!(f, "Authenticated (user: {username})")
            }
            SessionState::Closed => write!(f, "Closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated() -> SessionState {
        SessionState::Authenticated {
            session: "ABCDEF01".to_string(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_session_accessors() {
        assert!(!SessionState::Unauthenticated.is_authenticated());
        assert_eq!(SessionState::Unauthenticated.session(), None);

        let state = authenticated();
        assert!(state.is_authenticated());
        assert_eq!(state.session(), Some("ABCDEF01"));
        assert_eq!(state.to_string(), "Authenticated (user: alice)");

        assert!(SessionState::Closed.is_closed());
        assert_eq!(SessionState::Closed.session(), None);
    }

    #[test]
    fn test_valid_transitions() {
        use SessionState::*;

        assert!(Unauthenticated.can_transition_to(&authenticated()));
        assert!(authenticated().can_transition_to(&Unauthenticated));
        assert!(authenticated().can_transition_to(&authenticated()));
        assert!(authenticated().can_transition_to(&Closed));
        assert!(Unauthenticated.can_transition_to(&Closed));
    }

    #[test]
    fn test_closed_is_terminal() {
        use SessionState::*;

        assert!(!Closed.can_transition_to(&Unauthenticated));
        assert!(!Closed.can_transition_to(&authenticated()));
        assert!(!Unauthenticated.can_transition_to(&Unauthenticated));
    }
}
