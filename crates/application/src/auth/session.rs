//! Auth session manager.
//!
//! Owns the logged-in/logged-out status and the cached user profile. The
//! token store and the session state are always updated together while a
//! single lock is held, so no consumer can observe one without the other.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use marquee_domain::{AuthToken, UserProfile};

use crate::auth::TokenStore;
use crate::ports::StorefrontApi;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No credential.
    LoggedOut,
    /// A credential is stored but the profile has not been verified yet.
    LoggedInPendingProfile,
    /// The credential was verified and the profile is cached.
    LoggedInWithProfile,
}

/// Point-in-time view of the session, as consumers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// True unless the phase is `LoggedOut`.
    pub is_logged_in: bool,
    /// Cached profile; only present while logged in.
    pub user: Option<UserProfile>,
}

impl SessionSnapshot {
    fn of(state: &SessionState) -> Self {
        match state {
            SessionState::LoggedOut => Self {
                phase: SessionPhase::LoggedOut,
                is_logged_in: false,
                user: None,
            },
            SessionState::PendingProfile => Self {
                phase: SessionPhase::LoggedInPendingProfile,
                is_logged_in: true,
                user: None,
            },
            SessionState::WithProfile(user) => Self {
                phase: SessionPhase::LoggedInWithProfile,
                is_logged_in: true,
                user: Some(user.clone()),
            },
        }
    }

    /// Coin balance of the cached profile.
    #[must_use]
    pub fn coins(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.coins)
    }
}

/// Result of a profile refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No credential was stored, so nothing was verified.
    NoToken,
    /// The credential was verified and the profile replaced.
    Refreshed(UserProfile),
    /// Verification failed and the session was signed out.
    SignedOut,
    /// A login or logout happened while the call was outstanding; the
    /// response was ignored.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    LoggedOut,
    PendingProfile,
    WithProfile(UserProfile),
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    /// Bumped on every login and logout; a refresh only applies its result
    /// if the epoch is unchanged.
    epoch: u64,
}

/// Process-wide owner of the auth session.
pub struct SessionManager {
    tokens: TokenStore,
    api: Arc<dyn StorefrontApi>,
    inner: Mutex<Inner>,
    changes: watch::Sender<SessionSnapshot>,
}

impl SessionManager {
    /// Creates the session from whatever the token store holds.
    ///
    /// Starts `LoggedInPendingProfile` if a token is present, `LoggedOut`
    /// otherwise. Call [`Self::restore`] to verify a restored token.
    #[must_use]
    pub fn new(tokens: TokenStore, api: Arc<dyn StorefrontApi>) -> Self {
        let state = if tokens.is_present() {
            SessionState::PendingProfile
        } else {
            SessionState::LoggedOut
        };
        let (changes, _) = watch::channel(SessionSnapshot::of(&state));
        Self {
            tokens,
            api,
            inner: Mutex::new(Inner { state, epoch: 0 }),
            changes,
        }
    }

    /// Verifies a token restored from storage.
    pub async fn restore(&self) -> RefreshOutcome {
        if !self.is_logged_in() {
            return RefreshOutcome::NoToken;
        }
        self.refresh_profile().await
    }

    /// Returns the current session view.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.inner.lock().state)
    }

    /// Returns true unless the session is logged out.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !matches!(self.inner.lock().state, SessionState::LoggedOut)
    }

    /// Returns the cached profile, if verified.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        match &self.inner.lock().state {
            SessionState::WithProfile(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Returns the bearer credential for authenticated calls.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.tokens.get()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changes.subscribe()
    }

    /// Stores a new credential and verifies it.
    ///
    /// The token write and the transition to `LoggedInPendingProfile` happen
    /// before the first suspension point. Never fails; a rejected token ends
    /// in `LoggedOut` through [`Self::refresh_profile`].
    pub async fn login(&self, token: AuthToken) -> RefreshOutcome {
        self.begin_login(token);
        self.refresh_profile().await
    }

    /// Synchronous half of [`Self::login`]: store the token and enter
    /// `LoggedInPendingProfile` without verifying it.
    pub fn begin_login(&self, token: AuthToken) {
        let mut inner = self.inner.lock();
        self.tokens.set(token);
        inner.state = SessionState::PendingProfile;
        inner.epoch += 1;
        self.publish(&inner);
        info!("session logged in; profile pending");
    }

    /// Re-verifies the stored credential and replaces the cached profile.
    ///
    /// Any failure signs the session out; the error is logged and dropped.
    pub async fn refresh_profile(&self) -> RefreshOutcome {
        let (token, epoch) = {
            let inner = self.inner.lock();
            let Some(token) = self.tokens.get() else {
                return RefreshOutcome::NoToken;
            };
            (token, inner.epoch)
        };

        debug!(token = %token.preview(), "verifying session");
        let result = self.api.verify_identity(&token).await;

        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            debug!("session changed while verifying; ignoring response");
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(profile) => {
                inner.state = SessionState::WithProfile(profile.clone());
                self.publish(&inner);
                info!(user_id = profile.id, "session profile loaded");
                RefreshOutcome::Refreshed(profile)
            }
            Err(err) => {
                warn!(error = %err, "session verification failed; signing out");
                self.sign_out(&mut inner);
                RefreshOutcome::SignedOut
            }
        }
    }

    /// Removes the credential and clears the profile. Idempotent.
    pub fn logout(&self) {
        let mut inner = self.inner.lock();
        self.sign_out(&mut inner);
    }

    /// Signs out only if `token` is still the stored credential.
    ///
    /// A rejection that arrives after a newer login leaves that login alone.
    /// Returns true if the session was signed out.
    pub fn logout_if_current(&self, token: &AuthToken) -> bool {
        let mut inner = self.inner.lock();
        if self.tokens.get().as_ref() != Some(token) {
            debug!("credential already replaced; keeping session");
            return false;
        }
        self.sign_out(&mut inner);
        true
    }

    /// Applies a confirmed server write to the cached profile.
    ///
    /// Returns false if no verified profile is cached.
    pub fn amend_user(&self, amend: impl FnOnce(&mut UserProfile)) -> bool {
        let mut inner = self.inner.lock();
        let SessionState::WithProfile(user) = &mut inner.state else {
            return false;
        };
        amend(user);
        self.publish(&inner);
        true
    }

    fn sign_out(&self, inner: &mut Inner) {
        let was_logged_in = !matches!(inner.state, SessionState::LoggedOut);
        self.tokens.remove();
        inner.state = SessionState::LoggedOut;
        inner.epoch += 1;
        self.publish(inner);
        if was_logged_in {
            info!("session logged out");
        }
    }

    fn publish(&self, inner: &Inner) {
        let next = SessionSnapshot::of(&inner.state);
        self.changes.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("tokens", &self.tokens)
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}
