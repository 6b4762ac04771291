// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Pitwall: a driver search proxy in front of the OpenF1 API.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod search;
pub mod upstream;

use std::sync::Arc;

use api::AppState;
use config::UpstreamConfig;
use error::AppError;
use metrics::Metrics;
use search::SearchService;
use upstream::UpstreamClient;

/// Wire the shared upstream client, search service and metrics together.
pub fn build_state(upstream: UpstreamConfig) -> Result<AppState, AppError> {
    let metrics = Metrics::new()?;
    let client = UpstreamClient::try_new(upstream, metrics.clone())?;
    let search = SearchService::new(Arc::new(client), metrics.clone());

    Ok(AppState {
        search: Arc::new(search),
        metrics,
    })
}
