use crate::constants::network::TIMEOUT_API_REQUEST_MS;
use crate::errors::SyncError;
use crate::services::logger::Logger;
use crate::utils::paths::{resolve_api_base_url, resolve_api_token, resolve_org_id};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

pub const STATUS_RUNNING: &str = "RUNNING";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dns: String,
    #[serde(default)]
    pub status: String,
}

#[async_trait]
pub trait WorkspaceInventory: Send + Sync {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceRecord>, SyncError>;
}

static HOSTNAME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]*$").expect("hostname regex"));

pub fn active_identifiers_from(logger: &Logger, records: &[WorkspaceRecord]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut identifiers = Vec::new();
    for record in records {
        if !record.status.eq_ignore_ascii_case(STATUS_RUNNING) {
            continue;
        }
        let dns = record.dns.trim();
        if dns.is_empty() || !HOSTNAME_SHAPE.is_match(dns) {
            logger.warn(
                &format!(
                    "Skipping workspace {} with unusable dns {:?}",
                    record.id, record.dns
                ),
                None,
            );
            continue;
        }
        if seen.insert(dns.to_string()) {
            identifiers.push(dns.to_string());
        }
    }
    identifiers
}

pub struct HttpInventory {
    logger: Logger,
    client: Client,
    base_url: Url,
    token: String,
    org_id: String,
}

impl HttpInventory {
    pub fn from_env(logger: Logger) -> Result<Self, SyncError> {
        let base = resolve_api_base_url().ok_or_else(|| {
            SyncError::invalid_params("DEVSYNC_API_URL is not set")
                .with_hint("Example: DEVSYNC_API_URL=https://api.example.com")
        })?;
        let base_url = Url::parse(&base).map_err(|err| {
            SyncError::invalid_params(format!("DEVSYNC_API_URL is not a valid URL: {}", err))
        })?;
        let token = resolve_api_token()
            .ok_or_else(|| SyncError::invalid_params("DEVSYNC_API_TOKEN is not set"))?;
        let org_id = resolve_org_id()
            .ok_or_else(|| SyncError::invalid_params("DEVSYNC_ORG_ID is not set"))?;
        let client = Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_API_REQUEST_MS))
            .build()
            .map_err(|err| SyncError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("inventory"),
            client,
            base_url,
            token,
            org_id,
        })
    }
}

#[async_trait]
impl WorkspaceInventory for HttpInventory {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceRecord>, SyncError> {
        let url = self
            .base_url
            .join(&format!("api/organizations/{}/workspaces", self.org_id))
            .map_err(|err| {
                SyncError::invalid_params(format!("Cannot build workspace listing URL: {}", err))
            })?;
        self.logger.debug(&format!("GET {}", url), None);
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| {
                SyncError::identifier_source(format!("Workspace inventory request failed: {}", err))
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::identifier_source(format!(
                "Workspace inventory request returned {}",
                status
            ))
            .with_details(serde_json::json!({
                "url": url.as_str(),
                "status": status.as_u16(),
            })));
        }
        response.json::<Vec<WorkspaceRecord>>().await.map_err(|err| {
            SyncError::identifier_source(format!(
                "Workspace inventory response could not be decoded: {}",
                err
            ))
        })
    }
}
