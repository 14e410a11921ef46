//! The auth context: a small state machine tracking whether the current
//! tab has a signed-in user, plus token storage and the one-slot
//! redirect-after-login memory.

use std::sync::{Arc, Mutex};

/// Where the bearer token lives. The production build backs this with the
/// browser's storage; tests use [`InMemoryTokenStore`].
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// A process-local token store.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn store(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

/// The tab-wide authentication phase.
///
/// While `Unknown`, protected views show a loading placeholder and issue
/// no data requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    /// Initial state: a stored token (if any) is being checked.
    Unknown,
    /// The token verified; the signed-in subject is known.
    Authenticated { subject: String },
    /// No token, or verification failed.
    Anonymous,
}

pub struct AuthContext {
    tokens: Arc<dyn TokenStore>,
    phase: AuthPhase,
    /// One-slot redirect memory, overwritten on every write.
    return_to: Option<String>,
}

impl AuthContext {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            tokens,
            phase: AuthPhase::Unknown,
            return_to: None,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    /// Whether data requests may be issued yet.
    pub fn is_settled(&self) -> bool {
        self.phase != AuthPhase::Unknown
    }

    /// The pending token check succeeded.
    pub fn resolve_authenticated(&mut self, subject: impl Into<String>) {
        self.phase = AuthPhase::Authenticated {
            subject: subject.into(),
        };
    }

    /// The pending token check failed or there was no token.
    pub fn resolve_anonymous(&mut self) {
        self.tokens.clear();
        self.phase = AuthPhase::Anonymous;
    }

    /// A fresh login: store the new token and re-enter `Unknown` until it
    /// is verified.
    pub fn begin_login(&mut self, token: &str) {
        self.tokens.store(token);
        self.phase = AuthPhase::Unknown;
    }

    /// Logout is immediate: the token is discarded, no verification round.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.phase = AuthPhase::Anonymous;
    }

    /// The server rejected the token mid-session.
    pub fn session_expired(&mut self) {
        self.tokens.clear();
        self.phase = AuthPhase::Anonymous;
    }

    /// Records where to land after the next successful login. Overwrites
    /// any previously recorded path.
    pub fn remember_return_to(&mut self, path: impl Into<String>) {
        self.return_to = Some(path.into());
    }

    /// Consumes the recorded path, if any.
    pub fn take_return_to(&mut self) -> Option<String> {
        self.return_to.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> (AuthContext, Arc<InMemoryTokenStore>) {
        let store = Arc::new(InMemoryTokenStore::default());
        (AuthContext::new(store.clone()), store)
    }

    #[test]
    fn starts_unknown_and_settles() {
        let (mut ctx, _) = context();
        assert_eq!(*ctx.phase(), AuthPhase::Unknown);
        assert!(!ctx.is_settled());

        ctx.resolve_authenticated("user_1");
        assert!(ctx.is_settled());
        assert_eq!(
            *ctx.phase(),
            AuthPhase::Authenticated {
                subject: "user_1".to_string()
            }
        );
    }

    #[test]
    fn login_reenters_unknown_with_the_new_token_stored() {
        let (mut ctx, store) = context();
        ctx.resolve_anonymous();

        ctx.begin_login("tok_abc");
        assert_eq!(*ctx.phase(), AuthPhase::Unknown);
        assert_eq!(store.load().as_deref(), Some("tok_abc"));
    }

    #[test]
    fn logout_is_immediate_and_discards_the_token() {
        let (mut ctx, store) = context();
        ctx.begin_login("tok_abc");
        ctx.resolve_authenticated("user_1");

        ctx.logout();
        assert_eq!(*ctx.phase(), AuthPhase::Anonymous);
        assert!(store.load().is_none());
    }

    #[test]
    fn failed_verification_clears_the_stored_token() {
        let (mut ctx, store) = context();
        ctx.begin_login("tok_stale");
        ctx.resolve_anonymous();
        assert!(store.load().is_none());
    }

    #[test]
    fn return_to_is_a_single_overwritten_slot() {
        let (mut ctx, _) = context();
        ctx.remember_return_to("/travel");
        ctx.remember_return_to("/stories");

        assert_eq!(ctx.take_return_to().as_deref(), Some("/stories"));
        assert!(ctx.take_return_to().is_none());
    }
}
