use serde_json::json;
use sponow::management::TokenManager;
use sponow::spotify::auth::{AuthError, redacted, token_from_exchange, token_from_refresh};
use sponow::types::TokenState;

// Helper function to create a logged-in token state
fn create_test_state() -> TokenState {
    TokenState {
        logged_in: true,
        access_token: "old-access".to_string(),
        refresh_token: "old-refresh".to_string(),
        auth_code: "auth-code".to_string(),
        expires_at: 1_000,
    }
}

#[test]
fn test_token_from_exchange_valid_response() {
    let response = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "expires_in": 3600,
        "scope": "user-read-playback-state"
    });

    let state = token_from_exchange(&response, "the-code", 10_000).unwrap();

    // A structurally valid response yields a logged-in state
    assert!(state.logged_in);
    assert_eq!(state.access_token, "new-access");
    assert_eq!(state.refresh_token, "new-refresh");

    // The consumed auth code is carried in the state
    assert_eq!(state.auth_code, "the-code");

    // Expiry is absolute: now + expires_in
    assert_eq!(state.expires_at, 10_000 + 3600);
}

#[test]
fn test_token_from_exchange_missing_fields() {
    // Missing refresh_token is malformed for the initial exchange
    let response = json!({
        "access_token": "new-access",
        "expires_in": 3600
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

    // Missing access_token is malformed
    let response = json!({
        "refresh_token": "new-refresh",
        "expires_in": 3600
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

    // Wrongly typed expires_in is malformed
    let response = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "expires_in": "soon"
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

    // An error body is malformed as well
    let response = json!({
        "error": "invalid_grant"
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
}

#[test]
fn test_token_from_exchange_non_positive_expiry() {
    // A zero lifetime would make the token stale on arrival
    let response = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "expires_in": 0
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

    // A negative lifetime must not wrap into a far-future expiry
    let response = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "expires_in": -1
    });
    let result = token_from_exchange(&response, "the-code", 10_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
}

#[test]
fn test_token_from_refresh_retains_prior_refresh_token() {
    let prior = create_test_state();

    // The provider may omit refresh_token from a refresh response
    let response = json!({
        "access_token": "refreshed-access",
        "expires_in": 1800
    });

    let state = token_from_refresh(&response, &prior, 20_000).unwrap();

    assert!(state.logged_in);
    assert_eq!(state.access_token, "refreshed-access");
    assert_eq!(state.expires_at, 20_000 + 1800);

    // The previously stored refresh token survives
    assert_eq!(state.refresh_token, "old-refresh");
}

#[test]
fn test_token_from_refresh_rotates_refresh_token() {
    let prior = create_test_state();

    // When the provider rotates the refresh token it replaces the stored one
    let response = json!({
        "access_token": "refreshed-access",
        "refresh_token": "rotated-refresh",
        "expires_in": 1800
    });

    let state = token_from_refresh(&response, &prior, 20_000).unwrap();
    assert_eq!(state.refresh_token, "rotated-refresh");
}

#[test]
fn test_token_from_refresh_missing_fields() {
    let prior = create_test_state();

    // access_token is required
    let response = json!({
        "expires_in": 1800
    });
    let result = token_from_refresh(&response, &prior, 20_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));

    // expires_in is required
    let response = json!({
        "access_token": "refreshed-access"
    });
    let result = token_from_refresh(&response, &prior, 20_000);
    assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
}

#[test]
fn test_token_from_refresh_non_positive_expiry() {
    let prior = create_test_state();

    // Zero and negative lifetimes are malformed on refresh too
    for expires_in in [0, -300] {
        let response = json!({
            "access_token": "refreshed-access",
            "expires_in": expires_in
        });
        let result = token_from_refresh(&response, &prior, 20_000);
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }
}

#[tokio::test]
async fn test_ensure_valid_noop_while_token_fresh() {
    // Token expires at 1_000 per the helper state
    let mut manager = TokenManager::new(create_test_state());
    let before = manager.state().clone();

    // Strictly before expiry nothing happens
    let refreshed = manager.ensure_valid(999).await.unwrap();
    assert!(!refreshed);
    assert_eq!(manager.state(), &before);

    // The expiry instant itself still counts as valid
    let refreshed = manager.ensure_valid(1_000).await.unwrap();
    assert!(!refreshed);
    assert_eq!(manager.state(), &before);
}

#[tokio::test]
async fn test_ensure_valid_noop_while_logged_out() {
    // An expired but logged-out state never triggers a refresh
    let mut state = create_test_state();
    state.logged_in = false;
    let mut manager = TokenManager::new(state);
    let before = manager.state().clone();

    let refreshed = manager.ensure_valid(u64::MAX).await.unwrap();
    assert!(!refreshed);
    assert_eq!(manager.state(), &before);
}

#[test]
fn test_redacted_blanks_secrets() {
    let response = json!({
        "access_token": "secret-access",
        "refresh_token": "secret-refresh",
        "expires_in": 3600
    });

    let rendered = redacted(&response);

    // Token values never appear in the rendered log line
    assert!(!rendered.contains("secret-access"));
    assert!(!rendered.contains("secret-refresh"));
    assert!(rendered.contains("REDACTED"));

    // Non-secret fields are kept
    assert!(rendered.contains("3600"));
}
