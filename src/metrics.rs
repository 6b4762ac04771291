// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics collection for Pitwall.
//!
//! Tracks search traffic and the health of the upstream roster feed.

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};
use std::sync::Arc;

use crate::error::AppError;

/// Metrics collector for Pitwall
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,

    // Search metrics
    pub search_requests: IntCounter,
    pub search_matches: IntCounter,
    pub records_skipped: IntCounter,

    // Upstream metrics
    pub upstream_requests: IntCounter,
    pub upstream_failures: IntCounter,
    pub upstream_latency: Histogram,
}

fn counter(name: &str, help: &str) -> Result<IntCounter, AppError> {
    IntCounter::with_opts(Opts::new(name, help))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create metric: {}", e)))
}

impl Metrics {
    pub fn new() -> Result<Self, AppError> {
        let registry = Registry::new();

        let search_requests = counter(
            "pitwall_search_requests_total",
            "Total number of driver searches served",
        )?;
        let search_matches = counter(
            "pitwall_search_matches_total",
            "Total number of driver records returned by searches",
        )?;
        let records_skipped = counter(
            "pitwall_records_skipped_total",
            "Total number of upstream roster entries skipped as malformed",
        )?;
        let upstream_requests = counter(
            "pitwall_upstream_requests_total",
            "Total number of roster fetches attempted against upstream",
        )?;
        let upstream_failures = counter(
            "pitwall_upstream_failures_total",
            "Total number of roster fetches that yielded no data",
        )?;

        let upstream_latency = Histogram::with_opts(
            HistogramOpts::new(
                "pitwall_upstream_latency_seconds",
                "Duration of upstream roster fetches in seconds",
            )
            .buckets(vec![
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.0, 5.0,
            ]),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create metric: {}", e)))?;

        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(search_requests.clone()),
            Box::new(search_matches.clone()),
            Box::new(records_skipped.clone()),
            Box::new(upstream_requests.clone()),
            Box::new(upstream_failures.clone()),
            Box::new(upstream_latency.clone()),
        ];
        for collector in collectors {
            registry.register(collector).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to register metric: {}", e))
            })?;
        }

        Ok(Self {
            registry: Arc::new(registry),
            search_requests,
            search_matches,
            records_skipped,
            upstream_requests,
            upstream_failures,
            upstream_latency,
        })
    }

    /// Record a completed search and the number of drivers it returned
    pub fn record_search(&self, matches: usize) {
        self.search_requests.inc();
        self.search_matches.inc_by(matches as u64);
    }

    pub fn record_skipped(&self, count: usize) {
        self.records_skipped.inc_by(count as u64);
    }

    /// Record an upstream roster fetch
    pub fn record_upstream_request(&self) {
        self.upstream_requests.inc();
    }

    /// Record an upstream roster fetch that produced no data
    pub fn record_upstream_failure(&self) {
        self.upstream_failures.inc();
    }

    /// Observe latency for an upstream roster fetch in seconds
    pub fn record_upstream_latency(&self, seconds: f64) {
        self.upstream_latency.observe(seconds);
    }

    /// Export metrics in Prometheus format
    pub fn export(&self) -> Result<String, AppError> {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode metrics: {}", e)))?;

        String::from_utf8(buffer).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to convert metrics to string: {}",
                e
            ))
        })
    }
}
