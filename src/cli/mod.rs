mod auth;
mod logout;
mod status;
mod watch;

pub use auth::auth;
pub use logout::logout;
pub use status::status;
pub use watch::watch;
