//! Token acquisition
//!
//! A [`TokenSource`] abstracts how the bridge obtains an identity: either by
//! delegating to a configured identity-provider client and fetching the user's
//! profile, or, when no real credential is configured, by synthesizing a
//! deterministic simulated identity after a fixed delay.

pub mod provider;
pub mod simulation;

pub use provider::{fetch_user_info, AccessTokenClient, UserInfoResponse};
pub use simulation::simulated_user;

use crate::models::UserRecord;
use crate::settings::ProviderSettings;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tokio::time::Duration;

/// Token acquisition errors
#[derive(Debug)]
pub enum TokenSourceError {
    /// The provider refused to issue a token (user denial or provider error)
    Provider(String),
    /// The userinfo request never produced a response
    UserInfoFetch(String),
    /// The userinfo endpoint answered with a non-success HTTP status
    UserInfoStatus(u16),
    /// The userinfo response body was not a valid profile document
    UserInfoParse(String),
}

impl fmt::Display for TokenSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSourceError::Provider(msg) => write!(f, "Provider error: {msg}"),
            TokenSourceError::UserInfoFetch(msg) => write!(f, "Userinfo fetch failed: {msg}"),
            TokenSourceError::UserInfoStatus(status) => {
                write!(f, "Userinfo request failed with status: {status}")
            }
            TokenSourceError::UserInfoParse(msg) => {
                write!(f, "Userinfo response was malformed: {msg}")
            }
        }
    }
}

impl std::error::Error for TokenSourceError {}

/// Produces a [`UserRecord`] asynchronously, or fails.
///
/// The source starts unconfigured; [`TokenSource::configure`] decides once
/// whether a real provider client exists. Until then (and whenever no client
/// could be built) every [`TokenSource::request_token`] call runs in
/// simulation mode.
pub struct TokenSource {
    settings: ProviderSettings,
    auth_delay: Duration,
    http: reqwest::Client,
    // Initialized exactly once; None inside means simulation mode
    client: OnceCell<Option<Arc<dyn AccessTokenClient>>>,
}

impl TokenSource {
    #[must_use]
    pub fn new(settings: ProviderSettings, auth_delay: Duration) -> Self {
        Self {
            settings,
            auth_delay,
            http: reqwest::Client::new(),
            client: OnceCell::new(),
        }
    }

    /// One-time setup. Safe to call any number of times: the factory runs at
    /// most once, and only when a real credential is configured.
    ///
    /// A factory failure is caught and logged; the source then degrades to
    /// simulation mode for all subsequent attempts.
    pub fn configure<F>(&self, factory: F)
    where
        F: FnOnce(&ProviderSettings) -> Result<Arc<dyn AccessTokenClient>, String>,
    {
        self.client.get_or_init(|| {
            if !self.settings.has_credential() {
                log::info!("⚠️ No provider credential configured. Simulation mode enabled.");
                return None;
            }
            match factory(&self.settings) {
                Ok(client) => {
                    log::info!("✅ Provider client initialized.");
                    Some(client)
                }
                Err(e) => {
                    log::error!("Provider client initialization failed: {e}");
                    None
                }
            }
        });
    }

    /// Whether the next attempt will run in simulation mode.
    #[must_use]
    pub fn is_simulation(&self) -> bool {
        !matches!(self.client.get(), Some(Some(_)))
    }

    /// Run one authentication attempt.
    ///
    /// In simulation mode this waits out the configured delay and returns the
    /// fixed simulated identity; it never fails. In provider mode it asks the
    /// client for a fresh access token (consent forced on every call) and then
    /// fetches the user's profile from the userinfo endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider refuses to issue a token, or the
    /// userinfo fetch fails (network error, non-success status, malformed
    /// body). Simulation mode never errors.
    pub async fn request_token(&self) -> Result<UserRecord, TokenSourceError> {
        let client = match self.client.get() {
            Some(Some(client)) => Arc::clone(client),
            // Unconfigured sources behave exactly like simulation mode
            _ => return Ok(simulation::simulated_login(self.auth_delay).await),
        };

        let access_token = client
            .request_access_token()
            .await
            .map_err(TokenSourceError::Provider)?;

        fetch_user_info(&self.http, &self.settings.userinfo_endpoint, &access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DenyingClient;

    #[async_trait]
    impl AccessTokenClient for DenyingClient {
        async fn request_access_token(&self) -> Result<String, String> {
            Err("access_denied".to_string())
        }
    }

    fn configured_provider() -> ProviderSettings {
        ProviderSettings {
            client_id: "real-client-id.apps.googleusercontent.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_configure_runs_factory_at_most_once() {
        let source = TokenSource::new(configured_provider(), Duration::from_millis(1));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            source.configure(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(DenyingClient) as Arc<dyn AccessTokenClient>)
            });
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!source.is_simulation());
    }

    #[test]
    fn test_configure_skips_factory_without_credential() {
        let source = TokenSource::new(ProviderSettings::default(), Duration::from_millis(1));
        let calls = AtomicUsize::new(0);

        source.configure(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(DenyingClient) as Arc<dyn AccessTokenClient>)
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(source.is_simulation());
    }

    #[test]
    fn test_factory_failure_degrades_to_simulation() {
        let source = TokenSource::new(configured_provider(), Duration::from_millis(1));
        source.configure(|_| Err("provider library not loaded".to_string()));
        assert!(source.is_simulation());

        // A later configure call cannot resurrect the client
        source.configure(|_| Ok(Arc::new(DenyingClient) as Arc<dyn AccessTokenClient>));
        assert!(source.is_simulation());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfigured_source_simulates_after_delay() {
        let delay = Duration::from_millis(1500);
        let source = TokenSource::new(ProviderSettings::default(), delay);
        let start = tokio::time::Instant::now();

        let user = source.request_token().await.unwrap();

        assert!(start.elapsed() >= delay);
        assert_eq!(user, simulated_user());
    }

    #[tokio::test]
    async fn test_provider_denial_is_a_provider_error() {
        let source = TokenSource::new(configured_provider(), Duration::from_millis(1));
        source.configure(|_| Ok(Arc::new(DenyingClient) as Arc<dyn AccessTokenClient>));

        let err = source.request_token().await.unwrap_err();
        assert!(matches!(err, TokenSourceError::Provider(_)));
        assert!(err.to_string().contains("access_denied"));
    }
}
