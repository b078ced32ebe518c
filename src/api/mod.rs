//! # API Module
//!
//! This module provides the HTTP endpoints served by the temporary local
//! server during authentication. It implements the OAuth callback that
//! completes the authorization-code flow plus a health check endpoint.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the redirect from Spotify's authorization server.
//!   Exchanges the received authorization code for a token pair and hands the
//!   resulting state to the waiting auth command through shared state.
//! - [`health`] - Returns application status and version information.
//!
//! ## Architecture
//!
//! Built with the [Axum](https://docs.rs/axum) web framework; each endpoint
//! is an async handler wired into the router in [`crate::server`].
//!
//! ## Related Modules
//!
//! - [`crate::spotify`] - performs the actual code-for-token exchange
//! - [`crate::types`] - the `TokenState` passed back through shared state

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
