// Copyright 2025 Memophor Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP API handlers for Pitwall.
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/drivers/search?name=` - Search the current roster by name
//! - `GET /metrics` - Prometheus metrics export
//!
//! Cross-origin requests are allowed from any origin. A panic while handling
//! a request is answered with a 500 and a JSON error body.

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::metrics::Metrics;
use crate::model::{SearchQuery, SearchResponse};
use crate::search::SearchService;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub metrics: Metrics,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/drivers/search", get(search_drivers))
        .route("/metrics", get(metrics))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Metrics endpoint
pub async fn metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state.metrics.export()
}

/// Search drivers by name
pub async fn search_drivers(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = match query {
        Ok(Query(pairs)) => SearchQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(%rejection, "unparseable search query string");
            SearchQuery::default()
        }
    };
    let name = query.name.unwrap_or_default();

    if name.is_empty() {
        return Err(AppError::bad_request("Name parameter is required"));
    }

    let drivers = state.search.search(&name).await;
    tracing::debug!(name = %name, matches = drivers.len(), "driver search complete");

    Ok(Json(SearchResponse { drivers }))
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "internal error".to_string()
    };

    AppError::Internal(anyhow::anyhow!(message)).into_response()
}
