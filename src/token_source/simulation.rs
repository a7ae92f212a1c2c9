//! Simulated identity used when no provider credential is configured
//!
//! This path keeps the whole bridge testable and demonstrable without any
//! external identity provider: after a fixed fake network delay it produces
//! the same deterministic record every time.

use crate::models::UserRecord;
use tokio::time::{sleep, Duration};
use url::Url;

pub const SIMULATED_ID: &str = "simulated_id_12345";
pub const SIMULATED_NAME: &str = "Xerox Developer";
pub const SIMULATED_EMAIL: &str = "developer@xerox.com";
pub const SIMULATED_PICTURE: &str = "https://lh3.googleusercontent.com/a/default-user=s96-c";
pub const SIMULATED_TOKEN: &str = "simulation_token_xyz";

/// The fixed identity returned by every simulated login.
///
/// # Panics
///
/// Panics if the hardcoded picture URL is invalid (should never happen)
#[must_use]
pub fn simulated_user() -> UserRecord {
    UserRecord {
        id: SIMULATED_ID.to_string(),
        name: SIMULATED_NAME.to_string(),
        email: SIMULATED_EMAIL.to_string(),
        picture: Url::parse(SIMULATED_PICTURE).unwrap(),
        token: SIMULATED_TOKEN.to_string(),
    }
}

/// Run one simulated login: wait out the fake network delay, then return the
/// deterministic record. This path never fails.
pub async fn simulated_login(delay: Duration) -> UserRecord {
    log::info!("🔄 Running simulated login (delay: {}ms)", delay.as_millis());
    sleep(delay).await;
    simulated_user()
}
