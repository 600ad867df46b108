// Catalog data gateway: fetches vehicles from the remote catalog and falls
// back to the local sample set when the catalog cannot be reached

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;

use crate::{
    config::Settings,
    error::{FetchError, GatewayError},
    models::{NormalizedVehicle, RawVehicleRecord, VehicleId},
    normalize::{normalize, normalize_batch},
    sample::{SAMPLE_VEHICLES, find_sample},
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

// Shared HTTP client; routes through the configured proxy when one is set
pub fn build_http_client(settings: &Settings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(proxy_url) = settings.proxy_url.as_deref().filter(|p| !p.is_empty()) {
        let proxy = reqwest::Proxy::all(proxy_url).context("Invalid proxy_url in configuration")?;
        builder = builder.proxy(proxy);
        tracing::info!("Outbound catalog requests will use the configured proxy.");
    }
    builder.build().context("Failed to build shared reqwest client")
}

pub struct CatalogGateway {
    client: Arc<Client>,
    base_url: String,
    timeout: Duration,
    list_fallback_delay: Duration,
    detail_fallback_delay: Duration,
}

impl CatalogGateway {
    pub fn new(client: Arc<Client>, settings: &Settings) -> Self {
        CatalogGateway {
            client,
            base_url: settings.catalog_base_url.trim_end_matches('/').to_string(),
            timeout: settings.request_timeout(),
            list_fallback_delay: settings.list_fallback_delay(),
            detail_fallback_delay: settings.detail_fallback_delay(),
        }
    }

    /// Fetches the full catalog. Never fails: any upstream problem yields the
    /// normalized local sample set after `list_fallback_delay`.
    pub async fn list_vehicles(&self) -> Vec<NormalizedVehicle> {
        let url = format!("{}/cars", self.base_url);
        tracing::debug!(url = %url, "Fetching catalog list");

        match self.fetch_json(&url).await.and_then(unwrap_list) {
            Ok(records) => {
                tracing::info!(url = %url, count = records.len(), "Fetched catalog from remote");
                normalize_batch(&records)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Catalog unreachable, using local samples");
                sleep(self.list_fallback_delay).await;
                normalize_batch(&SAMPLE_VEHICLES)
            }
        }
    }

    /// Fetches one vehicle. Falls back to the local sample with the same id;
    /// if there is none the original failure is returned.
    pub async fn get_vehicle(&self, id: &VehicleId) -> Result<NormalizedVehicle, GatewayError> {
        // The id is one path segment; text ids may carry '/', '?' or '#'
        let url = format!("{}/cars/{}", self.base_url, urlencoding::encode(&id.to_string()));
        tracing::debug!(url = %url, "Fetching vehicle details");

        match self.fetch_json(&url).await.and_then(unwrap_record) {
            Ok(record) => Ok(normalize(&record)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Catalog unreachable, trying local sample");
                match find_sample(id) {
                    Some(record) => {
                        sleep(self.detail_fallback_delay).await;
                        Ok(normalize(record))
                    }
                    None => Err(GatewayError::NotFoundOrUnavailable { id: id.clone(), source: e }),
                }
            }
        }
    }

    // One GET bounded by `timeout`; the request is dropped (aborted) when it fires
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }
            let body = response.bytes().await?;
            let value = serde_json::from_slice::<Value>(&body)
                .map_err(|e| FetchError::Malformed(e.to_string()))?;
            Ok::<Value, FetchError>(value)
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
    }
}

// Accepts a bare list or a `{ "data": [...] }` envelope. An envelope without
// a `data` list is an empty catalog.
fn unwrap_list(body: Value) -> Result<Vec<RawVehicleRecord>, FetchError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(FetchError::Malformed(format!("'data' is not a list: {}", other)));
            }
        },
        other => return Err(FetchError::Malformed(format!("expected a list, got {}", other))),
    };
    Ok(items.into_iter().map(RawVehicleRecord::from_value).collect())
}

// Accepts a bare record or a `{ "data": {...} }` envelope.
fn unwrap_record(body: Value) -> Result<RawVehicleRecord, FetchError> {
    match body {
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(inner @ Value::Object(_)) => Ok(RawVehicleRecord::from_value(inner)),
            None | Some(Value::Null) => Ok(RawVehicleRecord::from_value(Value::Object(envelope))),
            Some(other) => {
                // `data` was an ordinary field of the record itself
                envelope.insert("data".to_string(), other);
                Ok(RawVehicleRecord::from_value(Value::Object(envelope)))
            }
        },
        other => Err(FetchError::Malformed(format!("expected a record, got {}", other))),
    }
}
