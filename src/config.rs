// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Environment-driven configuration for Pitwall.

use std::env;
use std::net::SocketAddr;

use anyhow::{bail, Context, Result};

/// Session selector sent with every roster request.
pub const DEFAULT_SESSION_KEY: &str = "latest";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openf1.org/v1";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub session_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let listen_addr: SocketAddr = env::var("PITWALL_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("invalid PITWALL_ADDR")?;

        let base_url =
            env::var("PITWALL_UPSTREAM_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string());

        Ok(Self {
            listen_addr,
            upstream: UpstreamConfig::new(base_url)?,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("PITWALL_UPSTREAM_URL must not be empty");
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        })
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}
