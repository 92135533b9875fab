//! Auth guard: shared-secret check and per-chat session state.

use printbot_core::{AuthError, Session};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Grants or denies command execution against the shared secret loaded at startup.
/// Sessions are keyed by chat id and live for the process lifetime.
pub struct AuthGuard {
    password: String,
    sessions: RwLock<HashMap<i64, Session>>,
}

impl AuthGuard {
    /// Creates a guard with the secret from config. The secret is never logged.
    pub fn new(password: String) -> Self {
        Self {
            password,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Ensures a session exists for the chat and updates its last-seen time.
    pub async fn touch(&self, chat_id: i64) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id));
        session.last_seen = chrono::Utc::now();
    }

    /// Checks the supplied password and marks the session authenticated on match.
    pub async fn authenticate(&self, chat_id: i64, supplied: &str) -> Result<(), AuthError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(chat_id)
            .or_insert_with(|| Session::new(chat_id));
        if session.authenticated {
            warn!(chat_id, "Repeated authorization attempt");
            return Err(AuthError::AlreadyAuthorized);
        }
        if supplied == self.password {
            session.authenticated = true;
            session.last_seen = chrono::Utc::now();
            info!(chat_id, "Chat authorized");
            Ok(())
        } else {
            warn!(chat_id, "Wrong password");
            Err(AuthError::WrongPassword)
        }
    }

    /// True once the chat has authenticated with the correct password.
    pub async fn is_authorized(&self, chat_id: i64) -> bool {
        self.sessions
            .read()
            .await
            .get(&chat_id)
            .map(|s| s.authenticated)
            .unwrap_or(false)
    }

    /// Snapshot of the session for the chat, if any.
    pub async fn session(&self, chat_id: i64) -> Option<Session> {
        self.sessions.read().await.get(&chat_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state_not_authorized() {
        let guard = AuthGuard::new("secret123".to_string());
        assert!(!guard.is_authorized(12345).await);
        assert!(guard.session(12345).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_correct_password() {
        let guard = AuthGuard::new("secret123".to_string());
        assert!(guard.authenticate(12345, "secret123").await.is_ok());
        assert!(guard.is_authorized(12345).await);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let guard = AuthGuard::new("secret123".to_string());
        assert_eq!(
            guard.authenticate(12345, "wrong").await,
            Err(AuthError::WrongPassword)
        );
        assert!(!guard.is_authorized(12345).await);
    }

    #[tokio::test]
    async fn test_authenticate_twice_reports_already_authorized() {
        let guard = AuthGuard::new("secret123".to_string());
        guard.authenticate(12345, "secret123").await.unwrap();
        assert_eq!(
            guard.authenticate(12345, "secret123").await,
            Err(AuthError::AlreadyAuthorized)
        );
        assert!(guard.is_authorized(12345).await);
    }

    #[tokio::test]
    async fn test_sessions_are_per_chat() {
        let guard = AuthGuard::new("secret123".to_string());
        guard.authenticate(111, "secret123").await.unwrap();
        guard.authenticate(222, "secret123").await.unwrap();
        assert!(guard.is_authorized(111).await);
        assert!(guard.is_authorized(222).await);
        assert!(!guard.is_authorized(333).await);
    }

    #[tokio::test]
    async fn test_touch_creates_unauthenticated_session() {
        let guard = AuthGuard::new("secret123".to_string());
        guard.touch(12345).await;
        let session = guard.session(12345).await.expect("session");
        assert_eq!(session.chat_id, 12345);
        assert!(!session.authenticated);
    }
}
