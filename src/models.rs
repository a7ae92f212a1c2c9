use serde::{Deserialize, Serialize};
use url::Url;

/// Normalized identity produced by one successful authentication attempt.
///
/// Built exactly once per attempt, immutable afterwards, and never persisted.
/// The record is what gets handed to the host application, either as a raw
/// JSON string (bridge/message-handler channels) or URI-encoded inside a
/// redirect URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: Url,
    pub token: String,
}

impl UserRecord {
    /// Serialize the record to the JSON wire form used by every delivery channel.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails, which cannot happen for a
    /// well-formed record but is propagated rather than unwrapped.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One host application that can receive a handoff.
///
/// `scheme` is a URI template: the resolved redirect URL is built by appending
/// `data` and `token` query parameters to it. Native apps register a custom
/// scheme (`hortor://auth_callback`); the web test target uses a plain HTTPS
/// URL so the bridge works in environments with no native host at all.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TargetApp {
    pub key: String,
    pub scheme: String,
    pub display_name: String,
}

impl TargetApp {
    /// Whether this target is a plain-web destination rather than a native app.
    #[must_use]
    pub fn is_web_target(&self) -> bool {
        self.scheme.starts_with("https://") || self.scheme.starts_with("http://")
    }

    /// Check that the scheme template produces a parseable URI once the
    /// `data` and `token` parameters are substituted in.
    #[must_use]
    pub fn has_valid_scheme(&self) -> bool {
        let separator = if self.scheme.contains('?') { '&' } else { '?' };
        let probe = format!("{}{}data=x&token=y", self.scheme, separator);
        Url::parse(&probe).is_ok()
    }
}

/// Static, read-only registry of handoff targets, fixed at startup.
pub struct TargetRegistry {
    targets: Vec<TargetApp>,
}

/// Errors raised while building the target registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("target registry is empty")]
    Empty,
    #[error("duplicate target key: {0}")]
    DuplicateKey(String),
    #[error("invalid scheme template for target {0}: {1}")]
    InvalidScheme(String, String),
    #[error("target registry has no HTTPS fallback target")]
    NoWebFallback,
}

impl TargetRegistry {
    /// Build a registry, validating the structural invariants every target
    /// must satisfy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target list is empty
    /// - Two targets share a key
    /// - A scheme template does not resolve to a parseable URI
    /// - No target uses an HTTPS scheme (the universal web fallback)
    pub fn new(targets: Vec<TargetApp>) -> Result<Self, RegistryError> {
        if targets.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|t| t.key == target.key) {
                return Err(RegistryError::DuplicateKey(target.key.clone()));
            }
            if !target.has_valid_scheme() {
                return Err(RegistryError::InvalidScheme(
                    target.key.clone(),
                    target.scheme.clone(),
                ));
            }
        }
        if !targets.iter().any(TargetApp::is_web_target) {
            return Err(RegistryError::NoWebFallback);
        }
        Ok(Self { targets })
    }

    /// Look up a target by its unique key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TargetApp> {
        self.targets.iter().find(|t| t.key == key)
    }

    /// All registered targets, in registration order.
    #[must_use]
    pub fn targets(&self) -> &[TargetApp] {
        &self.targets
    }
}
