//! OAuth 2.0 token exchanges against the authorization server.
//!
//! This module provides:
//! - [`TokenAcquirer`] - The three grant exchanges: client-credentials,
//!   authorization-code, and refresh-token
//! - [`build_authorization_url`] - Pure builder for the authorize redirect
//! - [`AuthError`] - Errors raised by the exchanges
//!
//! Each exchange is an isolated form-encoded POST to the token endpoint,
//! authenticated with HTTP Basic client credentials. Responses are the
//! standard `{access_token, token_type, expires_in, scope, refresh_token?}`
//! JSON documents.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, RefreshToken, TokenResponse,
    TokenUrl,
    basic::{BasicClient, BasicTokenResponse, BasicTokenType},
    reqwest::async_http_client,
};
use thiserror::Error;
use url::form_urlencoded;

use crate::clock::{Clock, SystemClock};
use crate::config::SpotifyConfig;
use crate::credential::{CredentialSource, ServiceCredential, UserCredential};

/// Scopes requested when a user delegates access.
pub const AUTHORIZATION_SCOPES: &str = "user-read-private user-read-email \
     playlist-modify-public playlist-modify-private playlist-read-private \
     playlist-read-collaborative";

/// Fallback access-token lifetime when the server omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECONDS: u64 = 3600;

/// Error type for token-endpoint exchanges.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorization code was empty; checked before any network call.
    #[error("authorization code must not be empty")]
    InvalidAuthorizationCode,

    /// The refresh token was empty; checked before any network call.
    #[error("refresh token must not be empty")]
    InvalidRefreshToken,

    /// The authorization server rejected the exchange or was unreachable.
    #[error("token exchange failed: {message}")]
    ExchangeFailed { message: String },

    /// A configured endpoint URL could not be parsed.
    #[error("invalid endpoint URL: {message}")]
    InvalidEndpoint { message: String },
}

/// Performs OAuth token exchanges for the configured application.
///
/// Stateless between calls; every exchange builds its request from the
/// configuration. The clock is injected so issued-at arithmetic is testable.
pub struct TokenAcquirer {
    config: SpotifyConfig,
    clock: Arc<dyn Clock>,
}

impl TokenAcquirer {
    /// Create an acquirer using the system clock.
    pub fn new(config: SpotifyConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an acquirer with an injected clock.
    pub fn with_clock(config: SpotifyConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Exchange the application's client credentials for a service
    /// credential (`grant_type=client_credentials`).
    pub async fn client_credentials(&self) -> Result<ServiceCredential, AuthError> {
        let client = self.oauth_client()?;
        let response = client
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                message: e.to_string(),
            })?;

        let expires_in = expires_in_seconds(&response);
        let expires_at = self.clock.now() + Duration::seconds(expires_in as i64);

        tracing::debug!(expires_in, "obtained client-credentials token");

        Ok(ServiceCredential::new(
            response.access_token().secret(),
            expires_at,
        ))
    }

    /// Exchange an authorization code for a user credential
    /// (`grant_type=authorization_code`).
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
    ) -> Result<UserCredential, AuthError> {
        if code.trim().is_empty() {
            return Err(AuthError::InvalidAuthorizationCode);
        }

        let client = self.oauth_client()?;
        let response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                message: e.to_string(),
            })?;

        tracing::debug!("exchanged authorization code for user credential");

        Ok(self.user_credential_from(&response, None))
    }

    /// Exchange a refresh token for a fresh user credential
    /// (`grant_type=refresh_token`).
    ///
    /// Refresh tokens are not always rotated; when the server omits a new
    /// one, the credential keeps the token that was submitted.
    pub async fn refresh_user_credential(
        &self,
        refresh_token: &str,
    ) -> Result<UserCredential, AuthError> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }

        let client = self.oauth_client()?;
        let response = client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                message: e.to_string(),
            })?;

        tracing::debug!("refreshed user credential");

        Ok(self.user_credential_from(&response, Some(refresh_token)))
    }

    fn oauth_client(&self) -> Result<BasicClient, AuthError> {
        let auth_url =
            AuthUrl::new(self.config.auth_url.clone()).map_err(|e| AuthError::InvalidEndpoint {
                message: format!("auth URL: {}", e),
            })?;

        let token_url = TokenUrl::new(self.config.token_url.clone()).map_err(|e| {
            AuthError::InvalidEndpoint {
                message: format!("token URL: {}", e),
            }
        })?;

        let redirect_url = RedirectUrl::new(self.config.redirect_uri.clone()).map_err(|e| {
            AuthError::InvalidEndpoint {
                message: format!("redirect URL: {}", e),
            }
        })?;

        Ok(BasicClient::new(
            ClientId::new(self.config.client_id.clone()),
            Some(ClientSecret::new(
                self.config.client_secret.expose().to_string(),
            )),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url))
    }

    fn user_credential_from(
        &self,
        response: &BasicTokenResponse,
        prior_refresh_token: Option<&str>,
    ) -> UserCredential {
        let refresh_token = response
            .refresh_token()
            .map(|t| t.secret().to_string())
            .or_else(|| prior_refresh_token.map(str::to_string))
            .unwrap_or_default();

        let token_type = match response.token_type() {
            BasicTokenType::Bearer => "Bearer".to_string(),
            other => format!("{:?}", other),
        };

        let scope = response
            .scopes()
            .map(|scopes| {
                scopes
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        UserCredential::issued(
            response.access_token().secret(),
            refresh_token,
            token_type,
            expires_in_seconds(response),
            self.clock.now(),
            scope,
        )
    }
}

#[async_trait]
impl CredentialSource for TokenAcquirer {
    async fn fetch_service_credential(&self) -> Result<ServiceCredential, AuthError> {
        self.client_credentials().await
    }
}

fn expires_in_seconds(response: &BasicTokenResponse) -> u64 {
    response
        .expires_in()
        .map(|d| d.as_secs())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECONDS)
}

/// Build the authorization redirect URL for the configured application.
///
/// Pure: identical configuration yields byte-identical output. The query
/// carries `response_type=code`, the client id, the fixed scope set, and the
/// URL-encoded redirect URI.
pub fn build_authorization_url(config: &SpotifyConfig) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", AUTHORIZATION_SCOPES)
        .append_pair("redirect_uri", &config.redirect_uri)
        .finish();

    format!("{}?{}", config.auth_url, query)
}
