use reqwest::{StatusCode, header::HeaderMap};
use serde_json::Value;

use crate::{config, spotify, types::NowPlaying, utils, warning};

/// One captured response from the player endpoint: HTTP status, the response
/// headers flattened into one text block, and the parsed JSON body (`Null`
/// for the empty 204 body the endpoint answers with when nothing plays).
#[derive(Debug)]
pub struct PlayerResponse {
    pub status: StatusCode,
    pub headers: String,
    pub body: Value,
}

/// Fetches the currently playing state of the account.
///
/// Issues a bearer-authenticated GET against the player endpoint and captures
/// the body together with the response headers, since a rate-limited answer
/// carries its retry delay in a `Retry-After` header rather than the body.
///
/// # Arguments
///
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(PlayerResponse)` - Status, flattened headers, and body JSON
/// - `Err(reqwest::Error)` - Network error, timeout, or HTTP error
///
/// # Error Handling
///
/// A body that is present but not valid JSON is logged and mapped to `Null`;
/// the poll engine treats it like any other malformed payload and keeps the
/// previous track.
pub async fn current_playback(token: &str) -> Result<PlayerResponse, reqwest::Error> {
    let res = spotify::http_client()
        .get(config::spotify_player_url())
        .bearer_auth(token)
        .send()
        .await?;

    let status = res.status();
    let headers = flatten_headers(res.headers());
    let text = res.text().await?;

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) => {
                warning!("Failed to parse player response as json: {}", e);
                Value::Null
            }
        }
    };

    Ok(PlayerResponse {
        status,
        headers,
        body,
    })
}

/// Flattens a header map into `name: value` lines for retry-after scanning.
pub fn flatten_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Parses the player `item` payload into a normalized [`NowPlaying`] model.
///
/// Requires `album` to be an object and `artists` to be an array; any other
/// shape returns `None` so the caller keeps its previous track untouched.
/// Scalar fields that are absent or wrongly typed fall back to their
/// zero-equivalent instead of aborting the whole parse.
///
/// Artists are appended in API order, duplicates allowed. The cover URL is
/// taken from the first entry of `album.images` when that array is non-empty.
/// The release date splits `YYYY[-MM[-DD]]` positionally into year, month
/// and day.
pub fn parse_track(item: &Value) -> Option<NowPlaying> {
    let album = item["album"].as_object()?;
    let artist_list = item["artists"].as_array()?;

    let artists = artist_list
        .iter()
        .map(|artist| {
            artist["name"]
                .as_str()
                .or_else(|| artist.as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    let cover_url = album
        .get("images")
        .and_then(|images| images.as_array())
        .and_then(|images| images.first())
        .and_then(|first| first["url"].as_str().or_else(|| first.as_str()))
        .map(|url| url.to_string());

    let release_date = album
        .get("release_date")
        .and_then(|d| d.as_str())
        .unwrap_or_default();
    let (release_year, release_month, release_day) = utils::split_release_date(release_date);

    Some(NowPlaying {
        title: item["name"].as_str().unwrap_or_default().to_string(),
        album: album
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string(),
        artists,
        cover_url,
        duration_ms: item["duration_ms"].as_u64().unwrap_or_default(),
        progress_ms: 0,
        is_explicit: item["explicit"].as_bool().unwrap_or_default(),
        disc_number: item["disc_number"].as_u64().unwrap_or_default() as u32,
        track_number: item["track_number"].as_u64().unwrap_or_default() as u32,
        release_year,
        release_month,
        release_day,
        is_playing: false,
    })
}
