mod tokens;

pub use tokens::TokenError;
pub use tokens::TokenManager;
