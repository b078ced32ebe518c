use std::fmt;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::{config, info, spotify, types::TokenState, utils};

/// Errors produced by the token endpoint interaction.
///
/// `MalformedResponse` means the provider answered but the JSON lacked a
/// required field; retrying with the same input cannot succeed, so it is
/// surfaced to the user. `Transport` covers network and timeout failures,
/// which the next poll tick retries naturally.
#[derive(Debug)]
pub enum AuthError {
    MalformedResponse(String),
    Transport(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MalformedResponse(body) => {
                write!(f, "token response is missing required fields: {}", body)
            }
            AuthError::Transport(e) => write!(f, "token request failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err)
    }
}

/// Exchanges the one-time authorization code for a token pair.
///
/// POSTs `grant_type=authorization_code` with the client credentials as
/// `Authorization: Basic base64(id:secret)` and the registered redirect URI.
/// The response must carry a string `access_token`, a string `refresh_token`
/// and a positive numeric `expires_in`; any other shape yields
/// [`AuthError::MalformedResponse`].
///
/// # Arguments
///
/// * `code` - Authorization code received from the OAuth callback
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(TokenState)` - Logged-in state with `expires_at = now + expires_in`
/// - `Err(AuthError)` - Transport failure or structurally invalid response
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly; the exchange
/// should happen immediately after receiving the code.
pub async fn exchange_code(code: &str) -> Result<TokenState, AuthError> {
    let json = request_token(&[
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", &config::spotify_redirect_uri()),
    ])
    .await?;

    token_from_exchange(&json, code, utils::epoch())
}

/// Mints a new access token from the stored refresh token.
///
/// POSTs `grant_type=refresh_token` with the client credentials. The response
/// must carry `access_token` and `expires_in`; a `refresh_token` field is
/// optional because the provider may rotate it. When present it replaces the
/// stored refresh token, otherwise the existing one is retained.
///
/// # Arguments
///
/// * `current` - The token state being refreshed; its refresh token is sent
///   and its auth code carried over unchanged
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(TokenState)` - Fresh logged-in state with updated expiry
/// - `Err(AuthError)` - Transport failure or structurally invalid response
pub async fn refresh(current: &TokenState) -> Result<TokenState, AuthError> {
    let json = request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", &current.refresh_token),
    ])
    .await?;

    token_from_refresh(&json, current, utils::epoch())
}

/// Builds a logged-in [`TokenState`] from a code-exchange response.
///
/// Pure function over the response JSON; requires `access_token`,
/// `refresh_token` and a positive `expires_in` to be present with the right
/// types.
pub fn token_from_exchange(json: &Value, code: &str, now: u64) -> Result<TokenState, AuthError> {
    let (Some(access_token), Some(refresh_token), Some(expires_in)) = (
        json["access_token"].as_str(),
        json["refresh_token"].as_str(),
        json["expires_in"].as_i64().filter(|s| *s > 0),
    ) else {
        return Err(AuthError::MalformedResponse(redacted(json)));
    };

    Ok(TokenState {
        logged_in: true,
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        auth_code: code.to_string(),
        expires_at: now + expires_in as u64,
    })
}

/// Builds a logged-in [`TokenState`] from a refresh response.
///
/// Pure function over the response JSON; requires `access_token` and a
/// positive `expires_in`. A rotated `refresh_token` replaces the prior one,
/// an absent field keeps it.
pub fn token_from_refresh(
    json: &Value,
    prior: &TokenState,
    now: u64,
) -> Result<TokenState, AuthError> {
    let (Some(access_token), Some(expires_in)) = (
        json["access_token"].as_str(),
        json["expires_in"].as_i64().filter(|s| *s > 0),
    ) else {
        return Err(AuthError::MalformedResponse(redacted(json)));
    };

    let refresh_token = json["refresh_token"]
        .as_str()
        .unwrap_or(&prior.refresh_token);

    Ok(TokenState {
        logged_in: true,
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        auth_code: prior.auth_code.clone(),
        expires_at: now + expires_in as u64,
    })
}

/// Renders a token response for logging with the secrets blanked out.
pub fn redacted(json: &Value) -> String {
    let mut json = json.clone();
    if let Some(obj) = json.as_object_mut() {
        for key in ["access_token", "refresh_token"] {
            if obj.contains_key(key) {
                obj[key] = Value::String("REDACTED".to_string());
            }
        }
    }
    json.to_string()
}

/// Issues one POST against the token endpoint with basic-auth credentials.
async fn request_token(form: &[(&str, &str)]) -> Result<Value, AuthError> {
    let res = spotify::http_client()
        .post(config::spotify_apitoken_url())
        .header(
            AUTHORIZATION,
            format!("Basic {}", config::spotify_basic_credentials()),
        )
        .form(form)
        .send()
        .await?;

    let json: Value = res.json().await?;
    info!("Spotify token response: {}", redacted(&json));
    Ok(json)
}
