use std::{path::PathBuf, time::Duration};

use tokio::time::{self, MissedTickBehavior};

use crate::{
    error, info,
    management::TokenManager,
    poll::{Poller, TickOutcome},
    success,
    types::NowPlaying,
    warning,
};

/// Polls the player endpoint on a fixed interval and reports track changes.
///
/// The loop drives the poll engine from a single interval timer with
/// missed-tick-skip behavior; ticks are awaited one after another, so a slow
/// request delays the next tick instead of overlapping it. When an output
/// path is given, the current track snapshot is written there as JSON after
/// every successful parse, for other tools to pick up.
pub async fn watch(interval: u64, output: Option<PathBuf>) {
    let tokens = TokenManager::load_or_default().await;
    if !tokens.state().logged_in {
        error!("Not logged in. Please run sponow auth first.");
    }

    let mut poller = Poller::new(tokens).with_login_notifier(|ok, log| {
        if ok {
            success!("{}", log);
        } else {
            warning!("Login failed: {}", log);
        }
    });

    let mut ticker = time::interval(Duration::from_secs(interval.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_shown = String::new();
    let mut was_idle = false;

    loop {
        ticker.tick().await;

        match poller.tick().await {
            TickOutcome::Updated => {
                was_idle = false;
                let track = poller.now_playing();
                let line = describe(track);
                if line != last_shown {
                    info!("{}", line);
                    last_shown = line;
                }
                if let Some(path) = &output {
                    write_snapshot(path, track).await;
                }
            }
            TickOutcome::Idle => {
                if !was_idle {
                    info!("Nothing playing");
                    was_idle = true;
                }
            }
            TickOutcome::NotLoggedIn | TickOutcome::AuthFailed => {
                warning!("Login lost, stopping watch. Run sponow auth to re-authenticate.");
                break;
            }
            // Everything else already logged inside the engine; the previous
            // track stays in place and the next tick retries.
            _ => {}
        }
    }
}

fn describe(track: &NowPlaying) -> String {
    let state = if track.is_playing { "▶" } else { "⏸" };
    format!(
        "{} {} - {} ({})",
        state,
        track.artists.join(", "),
        track.title,
        track.album
    )
}

async fn write_snapshot(path: &PathBuf, track: &NowPlaying) {
    let json = match serde_json::to_string_pretty(track) {
        Ok(json) => json,
        Err(e) => {
            warning!("Failed to encode track snapshot: {}", e);
            return;
        }
    };

    if let Err(e) = async_fs::write(path, json).await {
        warning!("Failed to write track snapshot to {}: {}", path.display(), e);
    }
}
