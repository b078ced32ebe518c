use chrono::DateTime;

use crate::{
    info,
    management::TokenManager,
    poll::{Poller, TickOutcome},
    utils, warning,
};

/// Prints the login state and, when logged in, a one-shot view of the
/// currently playing track.
pub async fn status() {
    let tokens = TokenManager::load_or_default().await;
    let state = tokens.state();

    if !state.logged_in {
        info!("Not logged in. Run sponow auth to authenticate.");
        return;
    }

    let expiry = DateTime::from_timestamp(state.expires_at as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| state.expires_at.to_string());
    if state.is_expired(utils::epoch()) {
        info!("Logged in, token expired (will refresh on next poll)");
    } else {
        info!("Logged in, token valid until {}", expiry);
    }

    let mut poller = Poller::new(tokens);
    match poller.tick().await {
        TickOutcome::Updated => {
            let track = poller.now_playing();
            info!(
                "Now playing: {} - {} ({})",
                track.artists.join(", "),
                track.title,
                track.album
            );
        }
        TickOutcome::Idle => info!("Nothing playing right now"),
        outcome => warning!("Could not read player state: {:?}", outcome),
    }
}
