use crate::models::TargetApp;
use serde::{Deserialize, Serialize};
use std::fs;

/// Compiled-in provider credential. Leaving the placeholder in place (or
/// clearing the value entirely) switches the token source to simulation mode.
pub const DEFAULT_CLIENT_ID: &str = "YOUR_CLIENT_ID_HERE.apps.googleusercontent.com";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthguideSettings {
    pub provider: ProviderSettings,
    pub handoff: HandoffSettings,
    pub logging: LoggingSettings,
    pub targets: Vec<TargetSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// OAuth client credential (direct value, may be the placeholder)
    pub client_id: String,
    /// Environment variable name that overrides `client_id` when set
    pub client_id_env: Option<String>,
    pub userinfo_endpoint: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffSettings {
    /// Simulated network delay before the fabricated identity is produced
    pub auth_delay_ms: u64,
    /// How long the success state is shown before the channel fires
    pub presentation_delay_ms: u64,
    /// Delay before the flow resets after a web-target redirect
    pub reset_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSettings {
    pub key: String,
    pub scheme: String,
    pub display_name: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_id_env: None,
            userinfo_endpoint: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
            scope: "https://www.googleapis.com/auth/userinfo.profile \
                    https://www.googleapis.com/auth/userinfo.email"
                .to_string(),
        }
    }
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self {
            auth_delay_ms: 1500,
            presentation_delay_ms: 1000,
            reset_delay_ms: 2000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl From<TargetSettings> for TargetApp {
    fn from(settings: TargetSettings) -> Self {
        Self {
            key: settings.key,
            scheme: settings.scheme,
            display_name: settings.display_name,
        }
    }
}

impl AuthguideSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment initialization fails
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // Initialize environment and logging
        Self::initialize_environment()?;

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    /// Initialize environment variables and logging
    ///
    /// # Errors
    ///
    /// Returns an error if logger initialization fails
    fn initialize_environment() -> Result<(), Box<dyn std::error::Error>> {
        Self::load_env_file();
        env_logger::try_init()?;
        Ok(())
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `AUTHGUIDE_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        // 1. Start with default settings
        let mut settings = Self::default();

        // 2. Try to load from Settings.toml in current directory (lower priority)
        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        // 3. If AUTHGUIDE_SECRETS_DIR is set and contains Settings.toml, override
        // with those settings (higher priority)
        if let Ok(secrets_dir) = std::env::var("AUTHGUIDE_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                let secrets_settings: Self = basic_toml::from_str(&secrets_toml_content)?;

                println!("✓ Overriding settings from {}", secrets_path.display());

                settings = secrets_settings;
            } else {
                println!(
                    "ℹ AUTHGUIDE_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_provider_env_overrides(&mut settings.provider);
        Self::apply_handoff_env_overrides(&mut settings.handoff);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for provider settings
    fn apply_provider_env_overrides(provider_settings: &mut ProviderSettings) {
        if let Ok(client_id) = std::env::var("AUTHGUIDE_CLIENT_ID") {
            provider_settings.client_id = client_id;
        }
        if let Ok(userinfo_endpoint) = std::env::var("AUTHGUIDE_USERINFO_ENDPOINT") {
            provider_settings.userinfo_endpoint = userinfo_endpoint;
        }
    }

    /// Apply environment overrides for handoff timing settings
    fn apply_handoff_env_overrides(handoff_settings: &mut HandoffSettings) {
        Self::apply_numeric_env_override("AUTHGUIDE_AUTH_DELAY_MS", &mut handoff_settings.auth_delay_ms);
        Self::apply_numeric_env_override(
            "AUTHGUIDE_PRESENTATION_DELAY_MS",
            &mut handoff_settings.presentation_delay_ms,
        );
        Self::apply_numeric_env_override(
            "AUTHGUIDE_RESET_DELAY_MS",
            &mut handoff_settings.reset_delay_ms,
        );
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Handoff targets from settings, falling back to the compiled-in defaults
    /// when the settings file declares none.
    #[must_use]
    pub fn handoff_targets(&self) -> Vec<TargetApp> {
        if self.targets.is_empty() {
            return default_targets();
        }
        self.targets.iter().cloned().map(TargetApp::from).collect()
    }
}

impl ProviderSettings {
    /// Get the client ID, checking environment variable first, then falling
    /// back to the direct value
    #[must_use]
    pub fn get_client_id(&self) -> String {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return value;
            }
        }
        self.client_id.clone()
    }

    /// Whether a real provider credential has been configured. The compiled-in
    /// placeholder (or an empty value) means simulation mode.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        let client_id = self.get_client_id();
        !client_id.is_empty() && !client_id.contains("YOUR_CLIENT_ID")
    }
}

/// Compiled-in default target registry, matching the apps that embed this page.
#[must_use]
pub fn default_targets() -> Vec<TargetApp> {
    vec![
        TargetApp {
            key: "hortor".to_string(),
            scheme: "hortor://auth_callback".to_string(),
            display_name: "Hortor".to_string(),
        },
        TargetApp {
            key: "fontra".to_string(),
            scheme: "fontra://login_success".to_string(),
            display_name: "Fontra".to_string(),
        },
        TargetApp {
            key: "testing".to_string(),
            scheme: "https://github.com/XeroxDeveloper/authguide".to_string(),
            display_name: "Guide".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Helper function to clean all relevant environment variables for tests
    fn clean_env_vars() {
        std::env::remove_var("AUTHGUIDE_CLIENT_ID");
        std::env::remove_var("AUTHGUIDE_USERINFO_ENDPOINT");
        std::env::remove_var("AUTHGUIDE_AUTH_DELAY_MS");
        std::env::remove_var("AUTHGUIDE_PRESENTATION_DELAY_MS");
        std::env::remove_var("AUTHGUIDE_RESET_DELAY_MS");
        std::env::remove_var("AUTHGUIDE_SECRETS_DIR");
        std::env::remove_var("GOOGLE_CLIENT_ID");
    }

    #[test]
    fn test_default_settings_are_simulation_mode() {
        let settings = AuthguideSettings::default();
        assert_eq!(settings.provider.client_id, DEFAULT_CLIENT_ID);
        assert!(!settings.provider.has_credential());
        assert_eq!(settings.handoff.auth_delay_ms, 1500);
        assert_eq!(settings.handoff.presentation_delay_ms, 1000);
        assert_eq!(settings.handoff.reset_delay_ms, 2000);
    }

    #[test]
    #[serial]
    fn test_client_id_env_override() {
        clean_env_vars();

        let mut settings = AuthguideSettings::default();
        std::env::set_var(
            "AUTHGUIDE_CLIENT_ID",
            "real-client-id.apps.googleusercontent.com",
        );

        AuthguideSettings::apply_env_overrides(&mut settings);

        assert_eq!(
            settings.provider.client_id,
            "real-client-id.apps.googleusercontent.com"
        );
        assert!(settings.provider.has_credential());

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_client_id_env_indirection() {
        clean_env_vars();

        let provider = ProviderSettings {
            client_id_env: Some("GOOGLE_CLIENT_ID".to_string()),
            ..Default::default()
        };

        // Without the variable set, falls back to the direct (placeholder) value
        assert_eq!(provider.get_client_id(), DEFAULT_CLIENT_ID);
        assert!(!provider.has_credential());

        std::env::set_var("GOOGLE_CLIENT_ID", "from-env.apps.googleusercontent.com");
        assert_eq!(
            provider.get_client_id(),
            "from-env.apps.googleusercontent.com"
        );
        assert!(provider.has_credential());

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_handoff_delay_env_overrides() {
        clean_env_vars();

        let mut settings = AuthguideSettings::default();
        std::env::set_var("AUTHGUIDE_AUTH_DELAY_MS", "10");
        std::env::set_var("AUTHGUIDE_RESET_DELAY_MS", "20");

        AuthguideSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.handoff.auth_delay_ms, 10);
        assert_eq!(settings.handoff.reset_delay_ms, 20);
        assert_eq!(settings.handoff.presentation_delay_ms, 1000); // Unchanged

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_non_numeric_delay_override_is_ignored() {
        clean_env_vars();

        let mut settings = AuthguideSettings::default();
        std::env::set_var("AUTHGUIDE_AUTH_DELAY_MS", "not-a-number");

        AuthguideSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.handoff.auth_delay_ms, 1500);

        clean_env_vars();
    }

    #[test]
    fn test_default_targets_include_web_fallback() {
        let targets = default_targets();
        assert_eq!(targets.len(), 3);
        assert!(targets.iter().any(TargetApp::is_web_target));
        assert_eq!(
            targets.iter().find(|t| t.key == "testing").unwrap().scheme,
            "https://github.com/XeroxDeveloper/authguide"
        );
    }

    #[test]
    fn test_handoff_targets_prefers_configured_list() {
        let mut settings = AuthguideSettings::default();
        assert_eq!(settings.handoff_targets().len(), 3); // Compiled-in defaults

        settings.targets = vec![TargetSettings {
            key: "custom".to_string(),
            scheme: "https://example.com/cb".to_string(),
            display_name: "Custom".to_string(),
        }];
        let targets = settings.handoff_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].key, "custom");
    }

    #[test]
    #[serial]
    fn test_secrets_dir_settings_take_precedence() {
        clean_env_vars();

        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("Settings.toml");
        std::fs::write(
            &settings_path,
            r#"
[provider]
client_id = "secrets-client-id.apps.googleusercontent.com"
userinfo_endpoint = "https://www.googleapis.com/oauth2/v3/userinfo"
scope = "profile email"

[handoff]
auth_delay_ms = 42
presentation_delay_ms = 1000
reset_delay_ms = 2000

[logging]
level = "info"
"#,
        )
        .unwrap();

        std::env::set_var("AUTHGUIDE_SECRETS_DIR", dir.path());

        let settings = AuthguideSettings::load_base_settings().unwrap();
        assert_eq!(
            settings.provider.client_id,
            "secrets-client-id.apps.googleusercontent.com"
        );
        assert_eq!(settings.handoff.auth_delay_ms, 42);

        clean_env_vars();
    }

    #[test]
    fn test_settings_toml_parsing() {
        let toml = r#"
[provider]
client_id = "abc.apps.googleusercontent.com"
userinfo_endpoint = "https://www.googleapis.com/oauth2/v3/userinfo"
scope = "profile email"

[handoff]
auth_delay_ms = 500
presentation_delay_ms = 250
reset_delay_ms = 750

[logging]
level = "debug"

[[targets]]
key = "hortor"
scheme = "hortor://auth_callback"
display_name = "Hortor"

[[targets]]
key = "testing"
scheme = "https://github.com/XeroxDeveloper/authguide"
display_name = "Guide"
"#;
        let settings: AuthguideSettings = basic_toml::from_str(toml).unwrap();
        assert!(settings.provider.has_credential());
        assert_eq!(settings.handoff.auth_delay_ms, 500);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.targets.len(), 2);
    }
}
