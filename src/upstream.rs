// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Upstream fetcher for Pitwall.
//!
//! Pulls the driver roster for the configured session from the OpenF1 API.
//! Transport and decode failures are logged and reported as an absent
//! roster; they never reach the HTTP client as errors.

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::time::Instant;

use crate::config::UpstreamConfig;
use crate::error::{AppError, UpstreamError};
use crate::metrics::Metrics;
use crate::model::RawDriver;

const DRIVERS_ENDPOINT: &str = "drivers";

/// Source of the current driver roster.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Fetch the full roster, or `None` when no usable data could be obtained.
    async fn fetch_roster(&self) -> Option<Vec<RawDriver>>;
}

/// HTTP client wrapper for talking to the upstream data API.
#[derive(Clone)]
pub struct UpstreamClient {
    base_url: String,
    session_key: String,
    client: Client,
    metrics: Metrics,
}

impl UpstreamClient {
    /// Construct a new upstream client using the provided configuration.
    pub fn try_new(config: UpstreamConfig, metrics: Metrics) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to build upstream client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            session_key: config.session_key,
            client,
            metrics,
        })
    }

    async fn request_roster(&self) -> Result<Vec<RawDriver>, UpstreamError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            DRIVERS_ENDPOINT
        );

        let response = self
            .client
            .get(url)
            .query(&[("session_key", self.session_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        match payload {
            Value::Array(entries) => Ok(entries),
            _ => Err(UpstreamError::NotAnArray),
        }
    }
}

#[async_trait]
impl RosterSource for UpstreamClient {
    async fn fetch_roster(&self) -> Option<Vec<RawDriver>> {
        self.metrics.record_upstream_request();
        let start = Instant::now();

        let outcome = self.request_roster().await;
        self.metrics
            .record_upstream_latency(start.elapsed().as_secs_f64());

        match outcome {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), "fetched upstream roster");
                Some(entries)
            }
            Err(error) => {
                self.metrics.record_upstream_failure();
                tracing::warn!(
                    endpoint = DRIVERS_ENDPOINT,
                    session_key = %self.session_key,
                    %error,
                    "upstream roster unavailable",
                );
                None
            }
        }
    }
}
