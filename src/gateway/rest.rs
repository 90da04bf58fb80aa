//! PostgREST HTTP gateway.

use super::query::{Query, parse_content_range_total};
use super::{DataGateway, JsonRow, RowPage, strip_server_keys};
use crate::error::{PickerError, Result};
use crate::types::Collection;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// REST gateway configuration.
#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub base_url: String,
    /// Anonymous (or service) key sent as `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RestGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Blocking client for the hosted PostgREST backend.
pub struct RestGateway {
    client: Client,
    config: RestGatewayConfig,
}

/// Error body PostgREST returns for failed requests.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Helper to convert reqwest errors to transport errors
fn network_error(action: &str, collection: Collection, err: reqwest::Error) -> PickerError {
    PickerError::transport(format!("{} {}: {}", action, collection, err))
}

/// Turn a failed response into an API error carrying the backend's message.
fn api_error(response: Response) -> PickerError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    PickerError::api(status.as_u16(), backend_message(status, &body))
}

fn backend_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<BackendErrorBody>(body) {
        Ok(BackendErrorBody {
            message: Some(message),
            details,
            hint,
        }) => {
            let mut text = message;
            for extra in [details, hint].into_iter().flatten() {
                if !extra.is_empty() {
                    text.push_str(" (");
                    text.push_str(&extra);
                    text.push(')');
                }
            }
            text
        }
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

impl RestGateway {
    /// Create a new REST gateway.
    pub fn new(config: RestGatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| PickerError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            collection
        )
    }

    /// Attach the key headers every request needs.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Parse a `return=representation` body and take its single row.
    fn single_row(collection: Collection, response: Response, id: Option<i64>) -> Result<Value> {
        let rows: Vec<Value> = response
            .json()
            .map_err(|e| PickerError::decode(format!("{} response: {}", collection, e)))?;
        rows.into_iter().next().ok_or_else(|| match id {
            Some(id) => PickerError::api(404, format!("No {} row with id {}", collection, id)),
            None => PickerError::decode(format!("{} write returned no row", collection)),
        })
    }
}

impl DataGateway for RestGateway {
    fn select(&self, collection: Collection, query: &Query) -> Result<RowPage> {
        let mut request = self
            .authorize(self.client.get(self.table_url(collection)))
            .query(&query.to_params());
        if let Some(range) = query.range_header() {
            request = request.header("Range-Unit", "items").header("Range", range);
        }
        if query.count {
            request = request.header("Prefer", "count=exact");
        }

        debug!("GET {} {:?}", collection, query.to_params());
        let response = request
            .send()
            .map_err(|e| network_error("Failed to fetch", collection, e))?;

        let status = response.status();
        let total = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);

        // Paging past the end is an empty page, not a failure.
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(RowPage {
                rows: Vec::new(),
                total: total.or(Some(0)),
            });
        }
        if !status.is_success() {
            let err = api_error(response);
            warn!("select on {} failed: {}", collection, err);
            return Err(err);
        }

        let rows: Vec<Value> = response
            .json()
            .map_err(|e| PickerError::decode(format!("{} response: {}", collection, e)))?;
        Ok(RowPage {
            rows,
            total: if query.count { total } else { None },
        })
    }

    fn insert(&self, collection: Collection, row: &JsonRow) -> Result<Value> {
        let body = vec![Value::Object(strip_server_keys(row))];
        debug!("POST {}", collection);
        let response = self
            .authorize(self.client.post(self.table_url(collection)))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .map_err(|e| network_error("Failed to insert into", collection, e))?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }
        Self::single_row(collection, response, None)
    }

    fn update(&self, collection: Collection, id: i64, patch: &JsonRow) -> Result<Value> {
        debug!("PATCH {} id={}", collection, id);
        let response = self
            .authorize(self.client.patch(self.table_url(collection)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&Value::Object(strip_server_keys(patch)))
            .send()
            .map_err(|e| network_error("Failed to update", collection, e))?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }
        Self::single_row(collection, response, Some(id))
    }

    fn delete(&self, collection: Collection, id: i64) -> Result<()> {
        debug!("DELETE {} id={}", collection, id);
        let response = self
            .authorize(self.client.delete(self.table_url(collection)))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .map_err(|e| network_error("Failed to delete from", collection, e))?;

        if !response.status().is_success() {
            return Err(api_error(response));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
