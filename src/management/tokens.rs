use std::path::PathBuf;

use crate::{
    spotify::{self, auth::AuthError},
    types::TokenState,
    warning,
};

#[derive(Debug)]
pub enum TokenError {
    Auth(AuthError),
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Auth(e) => write!(f, "{}", e),
            TokenError::IoError(e) => write!(f, "token storage error: {}", e),
            TokenError::SerdeError(e) => write!(f, "token encoding error: {}", e),
        }
    }
}

impl From<AuthError> for TokenError {
    fn from(err: AuthError) -> Self {
        TokenError::Auth(err)
    }
}

impl From<std::io::Error> for TokenError {
    fn from(err: std::io::Error) -> Self {
        TokenError::IoError(err)
    }
}

/// Owner of the persisted [`TokenState`]. All mutation goes through this
/// type, and every mutation is written back as a single file so storage
/// never records a new access token against a stale refresh token.
pub struct TokenManager {
    state: TokenState,
}

impl TokenManager {
    pub fn new(state: TokenState) -> Self {
        TokenManager { state }
    }

    /// Loads the persisted state, falling back to the logged-out default
    /// when no state was saved yet or the file cannot be read.
    pub async fn load_or_default() -> Self {
        let path = Self::token_path();
        let state = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warning!("Stored token state is unreadable, starting logged out: {}", e);
                TokenState::default()
            }),
            Err(_) => TokenState::default(),
        };
        Self { state }
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.state).map_err(TokenError::SerdeError)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Refreshes the access token if it has expired, persisting the result.
    ///
    /// No-op while logged out or while the current token is still valid.
    /// Returns whether a refresh happened. A structurally invalid refresh
    /// response logs the account out (and persists that) before the error is
    /// propagated, so the caller never polls with a token known to be bad.
    pub async fn ensure_valid(&mut self, now: u64) -> Result<bool, TokenError> {
        if !self.state.logged_in || !self.state.is_expired(now) {
            return Ok(false);
        }

        match spotify::auth::refresh(&self.state).await {
            Ok(fresh) => {
                self.state = fresh;
                self.persist().await?;
                Ok(true)
            }
            Err(e) => {
                self.state.logged_in = false;
                if let Err(pe) = self.persist().await {
                    warning!("Failed to persist logged-out state: {}", pe);
                }
                Err(e.into())
            }
        }
    }

    /// Clears all token fields and persists the logged-out state.
    pub async fn logout(&mut self) -> Result<(), TokenError> {
        self.state = TokenState::default();
        self.persist().await
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("sponow/cache/token.json");
        path
    }
}
