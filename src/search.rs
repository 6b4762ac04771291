// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Driver search over the upstream roster.
//!
//! A record matches when the lower-cased query is a substring of its first
//! name, last name, or trimmed `first last` full name. Results keep upstream
//! order and are not de-duplicated.

use std::sync::Arc;

use crate::metrics::Metrics;
use crate::model::{DriverRecord, RecordOutcome};
use crate::upstream::RosterSource;

pub struct SearchService {
    source: Arc<dyn RosterSource>,
    metrics: Metrics,
}

impl SearchService {
    pub fn new(source: Arc<dyn RosterSource>, metrics: Metrics) -> Self {
        Self { source, metrics }
    }

    /// Search the current roster by driver name.
    ///
    /// An unavailable roster yields an empty result, same as no matches.
    /// A blank query matches nothing and skips the upstream call.
    pub async fn search(&self, query: &str) -> Vec<DriverRecord> {
        if query.trim().is_empty() {
            tracing::debug!("blank search query; returning no drivers");
            self.metrics.record_search(0);
            return Vec::new();
        }

        let Some(roster) = self.source.fetch_roster().await else {
            tracing::warn!(query, "error fetching driver list");
            self.metrics.record_search(0);
            return Vec::new();
        };

        let needle = query.to_lowercase();
        let mut drivers = Vec::new();
        let mut skipped = 0usize;

        for (index, raw) in roster.iter().enumerate() {
            match DriverRecord::from_raw(raw) {
                RecordOutcome::Valid(record) => {
                    if matches_name(&record, &needle) {
                        drivers.push(record);
                    }
                }
                RecordOutcome::Skipped(reason) => {
                    tracing::debug!(index, %reason, "skipping malformed roster entry");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, total = roster.len(), "skipped malformed roster entries");
            self.metrics.record_skipped(skipped);
        }

        self.metrics.record_search(drivers.len());
        drivers
    }
}

/// `needle` must already be lower-cased.
pub fn matches_name(record: &DriverRecord, needle: &str) -> bool {
    let first = record.first_name.to_lowercase();
    let last = record.last_name.to_lowercase();
    if first.contains(needle) || last.contains(needle) {
        return true;
    }

    let full = format!("{first} {last}");
    full.trim().contains(needle)
}
