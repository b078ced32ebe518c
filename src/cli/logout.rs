use crate::{error, management::TokenManager, success};

/// Clears the persisted token state.
pub async fn logout() {
    let mut tokens = TokenManager::load_or_default().await;
    match tokens.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to clear token state: {}", e),
    }
}
