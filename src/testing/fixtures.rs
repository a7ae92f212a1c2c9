//! Test fixtures providing pre-built test objects

use crate::models::{TargetRegistry, UserRecord};
use crate::settings::{default_targets, HandoffSettings, ProviderSettings};
use url::Url;

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// The deterministic record produced by simulation mode.
    #[must_use]
    pub fn simulated_user() -> UserRecord {
        crate::token_source::simulated_user()
    }

    /// A record shaped like a real provider-mode result.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded picture URL is invalid (should never happen)
    #[must_use]
    pub fn provider_user() -> UserRecord {
        UserRecord {
            id: "108212543067".to_string(),
            name: "Real User".to_string(),
            email: "real.user@example.com".to_string(),
            picture: Url::parse("https://example.com/avatar.png").unwrap(),
            token: "ya29.test_access_token".to_string(),
        }
    }

    /// The compiled-in default target registry.
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in defaults violate the registry invariants
    /// (should never happen)
    #[must_use]
    pub fn registry() -> TargetRegistry {
        TargetRegistry::new(default_targets()).unwrap()
    }

    /// Provider settings carrying a real (non-placeholder) credential.
    #[must_use]
    pub fn configured_provider() -> ProviderSettings {
        ProviderSettings {
            client_id: "real-client-id.apps.googleusercontent.com".to_string(),
            ..Default::default()
        }
    }

    /// Default handoff timing, as shipped.
    #[must_use]
    pub fn timing() -> HandoffSettings {
        HandoffSettings {
            auth_delay_ms: 1500,
            presentation_delay_ms: 1000,
            reset_delay_ms: 2000,
        }
    }
}
