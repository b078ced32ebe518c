use std::time::{Duration, Instant};

use serde_json::{Value, json};
use sponow::management::TokenManager;
use sponow::poll::{Poller, RateLimitWindow, TickOutcome};
use sponow::types::TokenState;
use sponow::utils::extract_retry_after;

// Helper function to create an engine with a logged-in token state
fn create_test_poller() -> Poller {
    Poller::new(TokenManager::new(TokenState {
        logged_in: true,
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        auth_code: "code".to_string(),
        expires_at: u64::MAX,
    }))
}

// Helper function to create a playing payload around a track item
fn create_player_body(private: bool) -> Value {
    json!({
        "device": {"is_private": private},
        "is_playing": true,
        "progress_ms": 5000,
        "item": {
            "album": {
                "name": "A",
                "images": [{"url": "u"}],
                "release_date": "2020-05-14"
            },
            "artists": [{"name": "X"}, {"name": "Y"}],
            "name": "T",
            "duration_ms": 1000,
            "explicit": false,
            "disc_number": 1,
            "track_number": 2
        }
    })
}

#[test]
fn test_extract_retry_after() {
    // Plain numeric value
    assert_eq!(extract_retry_after("Retry-After: 30"), 30);

    // Embedded in a full header block
    let headers = "content-type: application/json\r\nretry-after: 7\r\ncache-control: no-store";
    assert_eq!(extract_retry_after(headers), 7);

    // Non-numeric values parse to 0
    assert_eq!(extract_retry_after("Retry-After: tomorrow"), 0);

    // Missing header parses to 0
    assert_eq!(extract_retry_after("content-type: application/json"), 0);

    // Empty input parses to 0
    assert_eq!(extract_retry_after(""), 0);
}

#[test]
fn test_rate_limit_window_boundaries() {
    let now = Instant::now();
    let mut window = RateLimitWindow::default();

    // Unset means not suppressed
    assert!(!window.is_suppressed(now));

    // The parsed delay is handed back for reporting
    assert_eq!(window.record_limit("Retry-After: 30", now), 30);

    // Suppressed strictly before the window end
    assert!(window.is_suppressed(now));
    assert!(window.is_suppressed(now + Duration::from_secs(29)));

    // Not suppressed at the boundary or after it
    assert!(!window.is_suppressed(now + Duration::from_secs(30)));
    assert!(!window.is_suppressed(now + Duration::from_secs(31)));
}

#[test]
fn test_rate_limit_window_ignores_non_numeric() {
    let now = Instant::now();
    let mut window = RateLimitWindow::default();

    // A value that parses to 0 is reported as 0 and leaves suppression unset
    assert_eq!(window.record_limit("Retry-After: soonish", now), 0);
    assert!(!window.is_suppressed(now));
}

#[test]
fn test_rate_limit_window_expire() {
    let now = Instant::now();
    let mut window = RateLimitWindow::default();

    window.record_limit("Retry-After: 5", now);
    window.expire(now + Duration::from_secs(5));

    assert!(!window.is_suppressed(now + Duration::from_secs(1)));
}

#[test]
fn test_apply_response_updates_track() {
    let mut poller = create_test_poller();
    let now = Instant::now();

    let outcome = poller.apply_response(&create_player_body(false), "", now);
    assert_eq!(outcome, TickOutcome::Updated);

    let track = poller.now_playing();
    assert_eq!(track.title, "T");
    assert_eq!(track.album, "A");
    assert_eq!(track.artists, vec!["X".to_string(), "Y".to_string()]);
    assert_eq!(track.cover_url, Some("u".to_string()));

    // Progress and playing state come from the payload root
    assert_eq!(track.progress_ms, 5000);
    assert!(track.is_playing);
}

#[test]
fn test_apply_response_rate_limited() {
    let mut poller = create_test_poller();
    let now = Instant::now();
    let before = poller.now_playing().clone();

    let body = json!({"error": {"status": 429}});
    let outcome = poller.apply_response(&body, "Retry-After: 5", now);

    assert_eq!(outcome, TickOutcome::RateLimited(5));

    // The track model is untouched
    assert_eq!(poller.now_playing(), &before);

    // Fetching is suppressed for the advertised window
    assert!(poller.limiter().is_suppressed(now + Duration::from_secs(4)));
    assert!(!poller.limiter().is_suppressed(now + Duration::from_secs(5)));
}

#[test]
fn test_apply_response_other_api_error() {
    let mut poller = create_test_poller();
    let now = Instant::now();
    let before = poller.now_playing().clone();

    let body = json!({"error": {"status": 503}});
    let outcome = poller.apply_response(&body, "", now);

    assert_eq!(outcome, TickOutcome::ApiError(503));

    // No suppression and no mutation for non-429 errors
    assert!(!poller.limiter().is_suppressed(now));
    assert_eq!(poller.now_playing(), &before);
}

#[test]
fn test_apply_response_malformed_payload_keeps_previous_track() {
    let mut poller = create_test_poller();
    let now = Instant::now();

    // Establish a known track first
    poller.apply_response(&create_player_body(false), "", now);
    let before = poller.now_playing().clone();

    // A payload without a device object is structurally invalid
    let body = json!({"is_playing": true, "progress_ms": 9000});
    let outcome = poller.apply_response(&body, "", now);

    assert_eq!(outcome, TickOutcome::Malformed);
    assert_eq!(poller.now_playing(), &before);
}

#[test]
fn test_apply_response_bad_item_keeps_previous_track() {
    let mut poller = create_test_poller();
    let now = Instant::now();

    poller.apply_response(&create_player_body(false), "", now);
    let mut expected = poller.now_playing().clone();

    // Structurally valid payload, but the item cannot be parsed
    let body = json!({
        "device": {},
        "is_playing": false,
        "progress_ms": 7000,
        "item": {"artists": "not an array"}
    });
    let outcome = poller.apply_response(&body, "", now);
    assert_eq!(outcome, TickOutcome::Malformed);

    // Progress still advanced; everything else is unchanged
    expected.progress_ms = 7000;
    assert_eq!(poller.now_playing(), &expected);
}

#[test]
fn test_apply_response_private_session_updates_progress_only() {
    let mut poller = create_test_poller();
    let now = Instant::now();

    poller.apply_response(&create_player_body(false), "", now);
    let mut expected = poller.now_playing().clone();

    let mut body = create_player_body(true);
    body["progress_ms"] = json!(8000);
    body["item"]["name"] = json!("Hidden");

    let outcome = poller.apply_response(&body, "", now);
    assert_eq!(outcome, TickOutcome::PrivateSession);

    // Progress keeps moving, track metadata does not
    expected.progress_ms = 8000;
    assert_eq!(poller.now_playing(), &expected);
}

#[test]
fn test_apply_response_idle() {
    let mut poller = create_test_poller();
    let now = Instant::now();
    let before = poller.now_playing().clone();

    // Empty 204 body is mapped to Null upstream
    let outcome = poller.apply_response(&Value::Null, "", now);

    assert_eq!(outcome, TickOutcome::Idle);
    assert_eq!(poller.now_playing(), &before);
}

#[tokio::test]
async fn test_tick_skips_while_not_logged_in() {
    let mut poller = Poller::new(TokenManager::new(TokenState::default()));

    // A logged-out engine never touches the network
    assert_eq!(poller.tick().await, TickOutcome::NotLoggedIn);
}
