use serde::{Deserialize, Serialize};

/// Persisted OAuth token record. All fields are written together so storage
/// never holds a new access token next to a stale refresh token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenState {
    pub logged_in: bool,
    pub access_token: String,
    pub refresh_token: String,
    pub auth_code: String,
    pub expires_at: u64,
}

impl TokenState {
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// Normalized snapshot of the currently playing track, decoupled from the
/// provider's JSON shape. Replaced wholesale on each successful poll parse;
/// a failed parse leaves the previous value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub title: String,
    pub album: String,
    pub artists: Vec<String>,
    pub cover_url: Option<String>,
    pub duration_ms: u64,
    pub progress_ms: u64,
    pub is_explicit: bool,
    pub disc_number: u32,
    pub track_number: u32,
    pub release_year: Option<u32>,
    pub release_month: Option<u32>,
    pub release_day: Option<u32>,
    pub is_playing: bool,
}
