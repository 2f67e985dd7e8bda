//! Blocking client for the RT REST 1.0 search endpoint.

use anyhow::{Context as _, Result};
use std::time::Duration;
use tracing::debug;
use weekrev_sdk::{SearchSpec, TicketRecord, TicketSource};

mod credentials;
mod protocol;

pub use credentials::discover_password;
pub use protocol::parse_search_response;

const BASE_URL_VAR: &str = "WEEKREV_RT_URL";
const QUEUE_VAR: &str = "WEEKREV_RT_QUEUE";
const USER_VAR: &str = "WEEKREV_RT_USER";

const DEFAULT_QUEUE: &str = "Technology Support";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RtConfig {
    pub base_url: String,
    pub queue: String,
    pub user: String,
    pub password: String,
}

impl RtConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_VAR)
            .with_context(|| format!("{} is not set", BASE_URL_VAR))?;
        let queue = std::env::var(QUEUE_VAR).unwrap_or_else(|_| DEFAULT_QUEUE.to_string());
        let user =
            std::env::var(USER_VAR).with_context(|| format!("{} is not set", USER_VAR))?;
        let password = credentials::discover_password()?;

        Ok(Self {
            base_url,
            queue,
            user,
            password,
        })
    }
}

pub struct RtClient {
    http: reqwest::blocking::Client,
    config: RtConfig,
}

impl RtClient {
    pub fn new(config: RtConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("weekrev/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    fn search_url(&self) -> String {
        format!("{}/search/ticket", self.config.base_url.trim_end_matches('/'))
    }

    /// Restrict every search to the configured queue so each section
    /// ships exactly one concrete query to the wire.
    fn queue_scoped_query(&self, query: &str) -> String {
        format!("Queue = '{}' AND ({})", self.config.queue, query)
    }
}

impl TicketSource for RtClient {
    fn search(&self, spec: &SearchSpec) -> Result<Vec<TicketRecord>> {
        let query = self.queue_scoped_query(&spec.query);
        debug!(section = %spec.title, %query, "running tracker search");

        let response = self
            .http
            .get(self.search_url())
            .basic_auth(&self.config.user, Some(&self.config.password))
            .query(&[
                ("query", query.as_str()),
                ("orderby", "Owner"),
                ("format", "l"),
            ])
            .send()
            .with_context(|| format!("search request failed for '{}'", spec.title))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("tracker returned HTTP {} for '{}'", status, spec.title);
        }

        let body = response
            .text()
            .with_context(|| format!("failed to read search response for '{}'", spec.title))?;

        let records = protocol::parse_search_response(&body)
            .with_context(|| format!("malformed search response for '{}'", spec.title))?;
        debug!(section = %spec.title, tickets = records.len(), "search complete");

        Ok(records)
    }
}
