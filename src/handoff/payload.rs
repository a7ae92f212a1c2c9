//! Redirect payload construction
//!
//! The scheme-redirect channel carries the whole user record inside the
//! destination URL as `data=<urlencoded JSON>&token=<urlencoded token>`. The
//! two components are encoded independently so JSON structural characters can
//! never corrupt the URL, and decoding yields the original JSON and token
//! bit-for-bit.

use crate::models::UserRecord;

/// URI-encoded `data`/`token` pair ready for template substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffPayload {
    data: String,
    token: String,
}

impl HandoffPayload {
    /// Encode a serialized record and its bearer token as independent URI
    /// components.
    #[must_use]
    pub fn new(user_json: &str, token: &str) -> Self {
        Self {
            data: urlencoding::encode(user_json).into_owned(),
            token: urlencoding::encode(token).into_owned(),
        }
    }

    /// Encode a record directly.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization of the record fails.
    pub fn encode(user: &UserRecord) -> Result<Self, serde_json::Error> {
        Ok(Self::new(&user.to_json()?, &user.token))
    }

    /// URI-encoded JSON serialization of the record.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// URI-encoded bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Substitute the payload into a target's scheme template, producing the
    /// fully resolved redirect URI.
    #[must_use]
    pub fn resolve_uri(&self, scheme_template: &str) -> String {
        let separator = if scheme_template.contains('?') { '&' } else { '?' };
        format!(
            "{scheme_template}{separator}data={}&token={}",
            self.data, self.token
        )
    }
}
