//! Identity-provider boundary
//!
//! The token-issuance flow itself is an external collaborator: anything that
//! can turn a client credential and a scope string into an access token can
//! sit behind [`AccessTokenClient`]. This module owns the one piece of real
//! work on this side of the boundary, the userinfo fetch that turns a raw
//! access token into a normalized [`UserRecord`].

use crate::models::UserRecord;
use crate::token_source::TokenSourceError;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Client for the identity provider's token-issuance endpoint.
///
/// Implementations must force an explicit account-selection/consent step on
/// every call; a previously granted token is never silently reused.
#[async_trait]
pub trait AccessTokenClient: Send + Sync {
    /// Request a fresh access token from the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the user denies the request or the provider fails.
    async fn request_access_token(&self) -> Result<String, String>;
}

/// Userinfo endpoint response shape (OIDC standard claims subset).
#[derive(Deserialize, Debug)]
pub struct UserInfoResponse {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub picture: Url,
}

impl UserInfoResponse {
    /// Map the userinfo claims into a [`UserRecord`], carrying the original
    /// access token through so the host application can use it.
    #[must_use]
    pub fn into_user_record(self, access_token: String) -> UserRecord {
        UserRecord {
            id: self.sub,
            name: self.name,
            email: self.email,
            picture: self.picture,
            token: access_token,
        }
    }
}

/// Fetch the user's profile from the userinfo endpoint, authenticated with the
/// freshly issued access token.
///
/// Any failure here is terminal for the attempt: no partial record is ever
/// produced.
///
/// # Errors
///
/// Returns an error if:
/// - The network request fails
/// - The endpoint responds with a non-success HTTP status
/// - The response body is not a valid userinfo document
pub async fn fetch_user_info(
    http: &reqwest::Client,
    userinfo_endpoint: &str,
    access_token: &str,
) -> Result<UserRecord, TokenSourceError> {
    log::debug!("Fetching user profile from: {userinfo_endpoint}");

    let response = http
        .get(userinfo_endpoint)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| TokenSourceError::UserInfoFetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(TokenSourceError::UserInfoStatus(response.status().as_u16()));
    }

    let user_info: UserInfoResponse = response
        .json()
        .await
        .map_err(|e| TokenSourceError::UserInfoParse(e.to_string()))?;

    log::debug!("Successfully fetched user profile for sub: {}", user_info.sub);
    Ok(user_info.into_user_record(access_token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_userinfo_claims_map_into_user_record() {
        let response = UserInfoResponse {
            sub: "108212543067".to_string(),
            name: "Real User".to_string(),
            email: "real.user@example.com".to_string(),
            picture: Url::parse("https://example.com/avatar.png").unwrap(),
        };

        let record = response.into_user_record("ya29.access".to_string());
        assert_eq!(record.id, "108212543067");
        assert_eq!(record.name, "Real User");
        assert_eq!(record.email, "real.user@example.com");
        assert_eq!(record.picture.as_str(), "https://example.com/avatar.png");
        assert_eq!(record.token, "ya29.access");
    }

    #[test]
    fn test_userinfo_response_parsing() {
        let body = r#"{
            "sub": "1234567890",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "picture": "https://example.com/jane.png"
        }"#;
        let parsed: UserInfoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.sub, "1234567890");

        // Missing claims make the whole document invalid
        let incomplete = r#"{"sub": "1234567890"}"#;
        assert!(serde_json::from_str::<UserInfoResponse>(incomplete).is_err());
    }
}
