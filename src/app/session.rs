//! Session store - owns the auth token and the signed-in user's profile

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::constants::TOKEN_KEY;
use crate::error::SessionError;
use crate::models::{AuthResponse, User};
use crate::network::ApiClient;
use crate::storage::TokenStore;

/// Either nobody is signed in, or a token together with its profile.
/// A token without a profile cannot be represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn { token: String, user: User },
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::SignedIn { token, .. } => Some(token),
            Session::SignedOut => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::SignedIn { user, .. } => Some(user),
            Session::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub session: Session,
    /// Set once bootstrap has finished, whatever its result
    pub initialized: bool,
}

pub struct SessionStore {
    client: ApiClient,
    storage: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(client: ApiClient, storage: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        SessionStore {
            client,
            storage,
            state,
            op_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().session.token().map(str::to_owned)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore a persisted session. Runs once; later calls return at once.
    ///
    /// Any failure (no stored token, rejected token, unreadable storage)
    /// ends signed out with the stored token removed.
    pub async fn bootstrap(&self) {
        let _op = self.op_lock.lock().await;
        if self.state.borrow().initialized {
            return;
        }

        let session = match self.restore().await {
            Ok(Some(session)) => {
                tracing::info!("Session restored");
                session
            }
            Ok(None) => Session::SignedOut,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding stored session");
                if let Err(e) = self.storage.remove(TOKEN_KEY) {
                    tracing::warn!(error = %e, "Failed to remove stored token");
                }
                Session::SignedOut
            }
        };

        self.state.send_replace(SessionState {
            session,
            initialized: true,
        });
    }

    async fn restore(&self) -> Result<Option<Session>, SessionError> {
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            return Ok(None);
        };
        let user = self.client.me(&token).await?;
        Ok(Some(Session::SignedIn { token, user }))
    }

    /// Errors are returned untouched so the caller can show them
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let _op = self.op_lock.lock().await;
        let auth = self.client.login(email, password).await?;
        self.persist(auth)
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, SessionError> {
        let _op = self.op_lock.lock().await;
        let auth = self.client.register(name, email, password).await?;
        self.persist(auth)
    }

    /// Token hits durable storage first; the in-memory state then flips in
    /// a single update, so observers never see a half-signed-in session.
    fn persist(&self, auth: AuthResponse) -> Result<User, SessionError> {
        self.storage.set(TOKEN_KEY, &auth.token)?;
        let user = auth.user.clone();
        self.state.send_replace(SessionState {
            session: Session::SignedIn {
                token: auth.token,
                user: auth.user,
            },
            initialized: true,
        });
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Always ends signed out, whatever the prior state
    pub async fn sign_out(&self) {
        let _op = self.op_lock.lock().await;
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove stored token");
        }
        self.state.send_replace(SessionState {
            session: Session::SignedOut,
            initialized: true,
        });
        tracing::info!("Signed out");
    }

    /// Re-fetch the profile, keeping the token. No-op when signed out.
    ///
    /// A 401 means the token went stale: the session is cleared before the
    /// error is returned.
    pub async fn refresh_profile(&self) -> Result<(), SessionError> {
        let _op = self.op_lock.lock().await;
        let Some(token) = self.token() else {
            return Ok(());
        };

        match self.client.me(&token).await {
            Ok(user) => {
                self.state.send_modify(|state| {
                    if let Session::SignedIn { token: current, user: held } = &mut state.session {
                        if *current == token {
                            *held = user;
                        }
                    }
                });
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Profile refresh rejected, clearing session");
                if let Err(e) = self.storage.remove(TOKEN_KEY) {
                    tracing::warn!(error = %e, "Failed to remove stored token");
                }
                self.state.send_replace(SessionState {
                    session: Session::SignedOut,
                    initialized: true,
                });
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
