use std::time::{Duration, Instant};

use serde_json::Value;

use crate::{
    info,
    management::{TokenError, TokenManager},
    spotify::player,
    types::NowPlaying,
    utils, warning,
};

/// Provider status code signalling "too many requests" in the error body.
pub const STATUS_TOO_MANY_REQUESTS: i64 = 429;

/// Suppression window set after a rate-limited response. Polling is skipped
/// while the window is open; it lives in memory only and never survives a
/// restart.
#[derive(Debug, Default)]
pub struct RateLimitWindow {
    suppress_until: Option<Instant>,
}

impl RateLimitWindow {
    /// Scans the flattened response headers for a `Retry-After` delay and
    /// opens the window accordingly, returning the parsed seconds. A missing
    /// or non-numeric value parses to 0 and leaves suppression unset.
    pub fn record_limit(&mut self, headers: &str, now: Instant) -> u64 {
        let seconds = utils::extract_retry_after(headers);
        if seconds > 0 {
            self.suppress_until = Some(now + Duration::from_secs(seconds));
        }
        seconds
    }

    /// True strictly while `now` is before the end of the window.
    pub fn is_suppressed(&self, now: Instant) -> bool {
        match self.suppress_until {
            Some(until) => now < until,
            None => false,
        }
    }

    /// Drops the window once it has elapsed.
    pub fn expire(&mut self, now: Instant) {
        if let Some(until) = self.suppress_until {
            if now >= until {
                self.suppress_until = None;
            }
        }
    }
}

/// Result of one poll tick. Every variant other than `Updated` leaves the
/// previous [`NowPlaying`] value untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No account is logged in; nothing to poll.
    NotLoggedIn,
    /// Token refresh failed; the account was logged out.
    AuthFailed,
    /// The rate-limit window is still open, fetch skipped.
    Suppressed,
    /// Network or timeout failure; the next tick retries naturally.
    TransportError,
    /// Provider signalled a rate limit; suppression recorded for the
    /// contained number of seconds.
    RateLimited(u64),
    /// Provider answered with an error body carrying this status.
    ApiError(i64),
    /// Nothing is playing (empty 204 body).
    Idle,
    /// The payload failed structural validation.
    Malformed,
    /// The playback device is private; only progress was updated.
    PrivateSession,
    /// The track model was replaced with a fresh parse.
    Updated,
}

/// Callback notified after every token refresh attempt, with the outcome and
/// a log line. Stands in for whatever surface displays login state.
pub type LoginNotifier = Box<dyn Fn(bool, &str) + Send>;

/// The poll engine. One tick validates the token, consults the rate-limit
/// governor, fetches the player state and folds the response into the
/// current [`NowPlaying`] model.
///
/// The engine itself is synchronous per tick; drive it from a single loop so
/// at most one tick is ever in flight.
pub struct Poller {
    tokens: TokenManager,
    limiter: RateLimitWindow,
    current: NowPlaying,
    notifier: Option<LoginNotifier>,
}

impl Poller {
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            tokens,
            limiter: RateLimitWindow::default(),
            current: NowPlaying::default(),
            notifier: None,
        }
    }

    /// Installs a login-state notifier invoked after refresh attempts.
    pub fn with_login_notifier(mut self, notifier: impl Fn(bool, &str) + Send + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.current
    }

    pub fn limiter(&self) -> &RateLimitWindow {
        &self.limiter
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Runs one poll tick to completion.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.tokens.state().logged_in {
            return TickOutcome::NotLoggedIn;
        }

        // Check-then-refresh happens here, synchronously, so the fetch below
        // never goes out with a token already known to be stale.
        match self.tokens.ensure_valid(utils::epoch()).await {
            Ok(true) => self.notify(true, "Spotify token refreshed"),
            Ok(false) => {}
            Err(TokenError::Auth(e)) => {
                let log = e.to_string();
                warning!("Spotify login failed: {}", log);
                self.notify(false, &log);
                return TickOutcome::AuthFailed;
            }
            Err(e) => {
                warning!("Token refresh could not be persisted: {}", e);
                return TickOutcome::AuthFailed;
            }
        }

        let now = Instant::now();
        if self.limiter.is_suppressed(now) {
            info!("Waiting out Spotify API rate limit");
            return TickOutcome::Suppressed;
        }
        self.limiter.expire(now);

        let token = self.tokens.state().access_token.clone();
        let response = match player::current_playback(&token).await {
            Ok(response) => response,
            Err(e) => {
                warning!("Player request failed: {}", e);
                return TickOutcome::TransportError;
            }
        };

        self.apply_response(&response.body, &response.headers, now)
    }

    /// Folds one player response into the engine state. Split from the
    /// fetch so response handling is testable without a network.
    pub fn apply_response(&mut self, body: &Value, headers: &str, now: Instant) -> TickOutcome {
        // The endpoint answers 204 with an empty body when nothing plays.
        if body.is_null() {
            return TickOutcome::Idle;
        }

        if !body["error"].is_null() {
            let status = body["error"]["status"].as_i64().unwrap_or(-1);
            if status == STATUS_TOO_MANY_REQUESTS {
                let seconds = self.limiter.record_limit(headers, now);
                if seconds > 0 {
                    warning!("Spotify API rate limit hit, waiting {} seconds", seconds);
                }
                return TickOutcome::RateLimited(seconds);
            }
            warning!("Spotify API error response, status {}", status);
            return TickOutcome::ApiError(status);
        }

        let device = &body["device"];
        let playing = &body["is_playing"];
        if !device.is_object() || !playing.is_boolean() {
            warning!("Couldn't read song data from player payload: {}", body);
            return TickOutcome::Malformed;
        }

        // Progress keeps the timeline moving even when the track itself
        // cannot be read, so it updates before the privacy branch.
        if let Some(progress) = body["progress_ms"].as_u64() {
            self.current.progress_ms = progress;
        }

        if device["is_private"].as_bool().unwrap_or(false) {
            warning!("Spotify session is private, can't read track");
            return TickOutcome::PrivateSession;
        }

        match player::parse_track(&body["item"]) {
            Some(mut track) => {
                track.progress_ms = self.current.progress_ms;
                track.is_playing = playing.as_bool().unwrap_or(false);
                self.current = track;
                TickOutcome::Updated
            }
            None => {
                warning!("Couldn't parse track item, keeping previous track");
                TickOutcome::Malformed
            }
        }
    }

    fn notify(&self, success: bool, log: &str) {
        if let Some(notifier) = &self.notifier {
            notifier(success, log);
        }
    }
}
