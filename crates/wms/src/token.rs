// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth2 client-credentials token cache.
//!
//! One token is shared by every request; it is refreshed on demand a little
//! before expiry so in-flight requests never carry a stale bearer.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Deserialize;

use crate::client::WmsError;

/// Refresh this long before the reported expiry.
const EXPIRY_LEEWAY: Duration = Duration::from_secs(60);

/// Fallback lifetime when the token endpoint omits `expires_in`.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Client-credentials grant against a token endpoint, with caching.
pub struct TokenSource {
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    /// A bearer token valid for at least the leeway window.
    pub async fn bearer(&self, http: &reqwest::Client) -> Result<String, WmsError> {
        if let Some(token) = self.cached_valid() {
            return Ok(token);
        }
        self.fetch(http).await
    }

    fn cached_valid(&self) -> Option<String> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|t| t.expires_at > Instant::now())
            .map(|t| t.access_token.clone())
    }

    async fn fetch(&self, http: &reqwest::Client) -> Result<String, WmsError> {
        tracing::debug!(token_url = %self.token_url, "fetching client-credentials token");
        let response = http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WmsError::Token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WmsError::Token(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| WmsError::Token(e.to_string()))?;

        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LIFETIME);
        let expires_at = Instant::now() + lifetime.saturating_sub(EXPIRY_LEEWAY);

        *self.cached.lock() = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }

    /// Drop the cached token so the next request re-authenticates.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
