// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production WMS client over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tms_core::{Phase, TaskforceUuid};

use crate::client::{WmsClient, WmsError};
use crate::routes;
use crate::token::TokenSource;
use crate::types::{
    PendingStarter, PendingStopper, StatusesBody, SubmitConfirmation, TaskforceQuery, TaskforceRow,
};

struct Inner {
    base_url: String,
    http: reqwest::Client,
    token: TokenSource,
}

/// WMS client backed by `reqwest` with client-credentials auth.
#[derive(Clone)]
pub struct RestWmsClient {
    inner: Arc<Inner>,
}

impl RestWmsClient {
    pub fn new(
        address: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, WmsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tms/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WmsError::Transport(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(Inner {
                base_url: address.into().trim_end_matches('/').to_string(),
                http,
                token: TokenSource::new(token_url, client_id, client_secret),
            }),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.inner.base_url, route)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        route: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, WmsError> {
        let bearer = self.inner.token.bearer(&self.inner.http).await?;
        let response = request
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| WmsError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // token may have been revoked server-side; re-auth on next call
            self.inner.token.invalidate();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WmsError::Status {
                route: route.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| WmsError::Transport(e.to_string()))?;
        // some confirmation routes answer with an empty body
        let payload = if text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };
        serde_json::from_str(payload).map_err(|e| WmsError::Decode {
            route: route.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WmsError> {
        let request = self.inner.http.get(self.url(route)).query(query);
        self.send(route, request).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<T, WmsError> {
        let request = self.inner.http.post(self.url(route)).json(body);
        self.send(route, request).await
    }

    async fn post_bodyless<T: DeserializeOwned>(&self, route: &str) -> Result<T, WmsError> {
        let request = self.inner.http.post(self.url(route));
        self.send(route, request).await
    }

    /// Empty-object responses mean "nothing pending".
    fn none_if_empty<T: DeserializeOwned>(
        route: &str,
        value: serde_json::Value,
    ) -> Result<Option<T>, WmsError> {
        if value.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| WmsError::Decode {
                route: route.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl WmsClient for RestWmsClient {
    async fn pending_starter(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStarter>, WmsError> {
        let route = routes::pending_starter();
        let value: serde_json::Value = self
            .get_json(&route, &[("collector", collector), ("schedd", schedd)])
            .await?;
        Self::none_if_empty(&route, value)
    }

    async fn pending_stopper(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStopper>, WmsError> {
        let route = routes::pending_stopper();
        let value: serde_json::Value = self
            .get_json(&route, &[("collector", collector), ("schedd", schedd)])
            .await?;
        Self::none_if_empty(&route, value)
    }

    async fn taskforce_phase(&self, uuid: &TaskforceUuid) -> Result<Phase, WmsError> {
        #[derive(serde::Deserialize)]
        struct PhaseOnly {
            phase: Phase,
        }
        let route = routes::taskforce(uuid);
        let record: PhaseOnly = self.get_json(&route, &[]).await?;
        Ok(record.phase)
    }

    async fn confirm_condor_submit(
        &self,
        uuid: &TaskforceUuid,
        body: &SubmitConfirmation,
    ) -> Result<(), WmsError> {
        let route = routes::condor_submit(uuid);
        let _: serde_json::Value = self.post_json(&route, body).await?;
        Ok(())
    }

    async fn condor_submit_failed(
        &self,
        uuid: &TaskforceUuid,
        error: &str,
    ) -> Result<(), WmsError> {
        let route = routes::condor_submit_failed(uuid);
        let _: serde_json::Value = self
            .post_json(&route, &serde_json::json!({ "error": error }))
            .await?;
        Ok(())
    }

    async fn confirm_condor_rm(&self, uuid: &TaskforceUuid) -> Result<(), WmsError> {
        let route = routes::condor_rm(uuid);
        let _: serde_json::Value = self.post_bodyless(&route).await?;
        Ok(())
    }

    async fn condor_rm_failed(&self, uuid: &TaskforceUuid) -> Result<(), WmsError> {
        let route = routes::condor_rm_failed(uuid);
        let _: serde_json::Value = self.post_bodyless(&route).await?;
        Ok(())
    }

    async fn condor_complete(
        &self,
        uuid: &TaskforceUuid,
        condor_complete_ts: i64,
    ) -> Result<(), WmsError> {
        let route = routes::condor_complete(uuid);
        let _: serde_json::Value = self
            .post_json(
                &route,
                &serde_json::json!({ "condor_complete_ts": condor_complete_ts }),
            )
            .await?;
        Ok(())
    }

    async fn post_statuses(&self, body: &StatusesBody) -> Result<(), WmsError> {
        let route = routes::statuses();
        let _: serde_json::Value = self.post_json(&route, body).await?;
        Ok(())
    }

    async fn query_taskforces(
        &self,
        query: &TaskforceQuery,
    ) -> Result<Vec<TaskforceRow>, WmsError> {
        #[derive(serde::Deserialize)]
        struct QueryResponse {
            taskforces: Vec<TaskforceRow>,
        }
        let route = routes::query_taskforces();
        let response: QueryResponse = self.post_json(&route, query).await?;
        Ok(response.taskforces)
    }
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
