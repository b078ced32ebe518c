//! # Spotify Integration Module
//!
//! This module provides the HTTP-facing half of the application: OAuth token
//! exchange against the accounts service and retrieval of the player state
//! from the Web API. It abstracts away request construction, authentication
//! headers, and the defensive parsing of Spotify's partially documented
//! response shapes, providing a clean Rust interface for the poll engine.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 authorization-code flow:
//! - **Code Exchange**: Trades the one-time authorization code for an access
//!   and refresh token pair using the client credentials
//! - **Token Refresh**: Mints new access tokens from the stored refresh token,
//!   honoring provider-side refresh token rotation
//! - **Structural Validation**: Any token response missing required fields is
//!   rejected as malformed rather than half-applied
//!
//! ### Player Module
//!
//! [`player`] - Handles the currently-playing endpoint:
//! - **Playback Fetch**: Bearer-authenticated GET capturing body and headers
//! - **Track Parsing**: Converts the nested `item` payload into the
//!   normalized [`crate::types::NowPlaying`] model
//!
//! ## Error Handling Philosophy
//!
//! Transport failures and malformed responses are separate concerns: the
//! former retry naturally on the next poll tick, the latter are surfaced to
//! the user since retrying an exchange with bad credentials cannot succeed.
//! Rate limiting (429 plus `Retry-After`) is not handled here; the poll
//! engine's governor decides when fetching may resume.
//!
//! ## Dependencies
//!
//! - **reqwest** - HTTP client with JSON support and async capabilities
//! - **serde_json** - JSON deserialization of API payloads
//! - **chrono** - Epoch timestamps for token expiry
//! - **tokio** - Async runtime and utilities

use std::time::Duration;

use reqwest::Client;

pub mod auth;
pub mod player;

/// Upper bound on any single API request. A hung call must not starve the
/// poll loop indefinitely; the next tick retries naturally.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Builds the HTTP client used for all Spotify requests.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}
