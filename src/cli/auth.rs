use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config, error, management::TokenManager, server::start_api_server, success, types::TokenState,
    warning,
};

/// Runs the complete OAuth 2.0 authorization-code flow with Spotify.
///
/// This function orchestrates the entire authentication process including:
/// 1. Starting a local callback server
/// 2. Opening the authorization URL in the user's browser
/// 3. Waiting for the OAuth callback to exchange the code for tokens
/// 4. Persisting the obtained token state for future polling
///
/// The callback handler performs the code-for-token exchange itself using the
/// client credentials and deposits the resulting [`TokenState`] in the shared
/// state this function polls.
///
/// # Arguments
///
/// * `shared_state` - Thread-safe slot through which the callback handler
///   hands the exchanged token state back to this function
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - Token persistence failures terminate the program with an error
/// - Authentication timeouts or failures terminate with an error message
pub async fn auth(shared_state: Arc<Mutex<Option<TokenState>>>) {
    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = &config::spotify_redirect_uri(),
        scope = &config::spotify_scope()
    );

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(state) => {
            let token_manager = TokenManager::new(state);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token state: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Waits for the OAuth callback to complete and return a token state.
///
/// Polls the shared state for a completed authentication with a 60-second
/// timeout. This function runs concurrently with the callback handler that
/// populates the state after a successful exchange.
///
/// # Returns
///
/// Returns `Some(TokenState)` if authentication completes successfully within
/// the timeout period, or `None` if the timeout is reached without a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<TokenState>>>) -> Option<TokenState> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(state) = lock.as_ref() {
            return Some(state.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
