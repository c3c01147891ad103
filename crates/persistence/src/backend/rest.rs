// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    Backend, Bucket, Filter, FilterOp, ListOptions, Row, Select, Session, StorageObject,
    scalar_text,
};
use crate::config::BackendConfig;
use crate::error::PersistenceError;
use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A `PostgREST` / storage / auth client for a hosted backend.
#[derive(Debug)]
pub struct RestBackend {
    client: reqwest::Client,
    base_url: Url,
    anon_key: String,
    /// Access token of the anonymous session, once established.
    access_token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    access_token: String,
    #[serde(default)]
    user: Option<SignUpUser>,
}

#[derive(Debug, Deserialize)]
struct SignUpUser {
    id: String,
}

impl RestBackend {
    /// Builds a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if the connection gate is closed, or
    /// `InvalidConfiguration` if the URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, PersistenceError> {
        if !config.is_configured() {
            return Err(PersistenceError::NotConfigured);
        }

        let trimmed: &str = config.url().trim().trim_end_matches('/');
        let base_url: Url = Url::parse(&format!("{trimmed}/")).map_err(|e| {
            PersistenceError::InvalidConfiguration(format!("{}: {e}", config.url()))
        })?;

        let client: reqwest::Client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PersistenceError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key().to_string(),
            access_token: RwLock::new(None),
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PersistenceError> {
        let mut url: Url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PersistenceError::InvalidConfiguration(format!(
                    "{} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn table_url(&self, table: &str) -> Result<Url, PersistenceError> {
        self.endpoint(&["rest", "v1", table])
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token: String = self
            .access_token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        request.header("apikey", &self.anon_key).bearer_auth(token)
    }

    pub(crate) fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|filter| {
                let value: String = match (filter.op, &filter.value) {
                    (FilterOp::Eq, Value::Null) => String::from("is.null"),
                    (FilterOp::Eq, value) => format!("eq.{}", scalar_text(value)),
                    (FilterOp::ILike, value) => format!("ilike.{}", scalar_text(value)),
                };
                (filter.column.clone(), value)
            })
            .collect()
    }

    fn select_params(query: &Select) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![(String::from("select"), String::from("*"))];
        params.extend(Self::filter_params(&query.filters));
        if let Some(order) = &query.order {
            let direction: &str = if order.ascending { "asc" } else { "desc" };
            params.push((String::from("order"), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = query.limit {
            params.push((String::from("limit"), limit.to_string()));
        }
        params
    }

    async fn send(request: RequestBuilder) -> Result<(StatusCode, String), PersistenceError> {
        let response: reqwest::Response = request.send().await?;
        let status: StatusCode = response.status();
        let body: String = response.text().await?;
        if status.is_success() {
            Ok((status, body))
        } else {
            Err(Self::parse_error(status, &body))
        }
    }

    async fn send_rows(request: RequestBuilder) -> Result<Vec<Row>, PersistenceError> {
        let (_, body) = Self::send(request).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str::<Vec<Row>>(&body)?)
    }

    /// Converts an error body into a `PersistenceError::Backend`.
    ///
    /// `PostgREST` reports `{code, message}`, the auth service `{msg}` or
    /// `{error_description}`, and storage `{error, message}`.
    pub(crate) fn parse_error(status: StatusCode, body: &str) -> PersistenceError {
        let parsed: Option<Value> = serde_json::from_str::<Value>(body).ok();
        let field = |name: &str| -> Option<String> {
            parsed
                .as_ref()
                .and_then(|value| value.get(name))
                .and_then(|value| match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        };

        let message: String = field("message")
            .or_else(|| field("msg"))
            .or_else(|| field("error_description"))
            .or_else(|| field("error"))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                }
            });

        PersistenceError::Backend {
            status: status.as_u16(),
            code: field("code"),
            message,
        }
    }

    /// Parses the total from a `Content-Range` header such as `0-24/25`.
    pub(crate) fn parse_content_range(value: &str) -> Option<u64> {
        value
            .rsplit_once('/')
            .and_then(|(_, total)| total.trim().parse::<u64>().ok())
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn count(&self, table: &str) -> Result<u64, PersistenceError> {
        let url: Url = self.table_url(table)?;
        let request: RequestBuilder = self
            .authorize(self.client.head(url))
            .await
            .query(&[("select", "*")])
            .header("Prefer", "count=exact");

        let response: reqwest::Response = request.send().await?;
        let status: StatusCode = response.status();
        if !status.is_success() {
            // HEAD responses carry no body
            return Err(Self::parse_error(status, ""));
        }

        let count: u64 = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse_content_range)
            .unwrap_or(0);
        debug!("count {} = {}", table, count);
        Ok(count)
    }

    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>, PersistenceError> {
        let url: Url = self.table_url(table)?;
        let request: RequestBuilder = self
            .authorize(self.client.get(url))
            .await
            .query(&Self::select_params(query));
        Self::send_rows(request).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, PersistenceError> {
        let url: Url = self.table_url(table)?;
        let request: RequestBuilder = self
            .authorize(self.client.post(url))
            .await
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&rows);
        Self::send_rows(request).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Row,
    ) -> Result<Vec<Row>, PersistenceError> {
        let url: Url = self.table_url(table)?;
        let request: RequestBuilder = self
            .authorize(self.client.patch(url))
            .await
            .query(&Self::filter_params(filters))
            .header("Prefer", "return=representation")
            .json(&changes);
        Self::send_rows(request).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, PersistenceError> {
        let url: Url = self.table_url(table)?;
        let request: RequestBuilder = self
            .authorize(self.client.delete(url))
            .await
            .query(&Self::filter_params(filters))
            .header("Prefer", "return=representation");
        Self::send_rows(request).await
    }

    async fn sign_in_anonymously(&self) -> Result<Session, PersistenceError> {
        let url: Url = self.endpoint(&["auth", "v1", "signup"])?;
        let request: RequestBuilder = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({ "data": {} }));

        let (_, body) = Self::send(request).await?;
        let parsed: SignUpResponse = serde_json::from_str(&body)?;
        let user_id: String = parsed.user.map(|user| user.id).unwrap_or_default();

        *self.access_token.write().await = Some(parsed.access_token.clone());
        debug!("anonymous session established for {}", user_id);

        Ok(Session {
            user_id,
            access_token: parsed.access_token,
        })
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>, PersistenceError> {
        let url: Url = self.endpoint(&["storage", "v1", "bucket"])?;
        let request: RequestBuilder = self.authorize(self.client.get(url)).await;
        let (_, body) = Self::send(request).await?;
        Ok(serde_json::from_str::<Vec<Bucket>>(&body)?)
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<Vec<StorageObject>, PersistenceError> {
        let url: Url = self.endpoint(&["storage", "v1", "object", "list", bucket])?;
        let request: RequestBuilder = self
            .authorize(self.client.post(url))
            .await
            .json(&json!({
                "prefix": prefix,
                "limit": options.limit,
                "offset": options.offset,
                "sortBy": { "column": "name", "order": "asc" },
            }));

        let (status, body) = Self::send(request).await?;
        if status == StatusCode::NO_CONTENT {
            warn!("empty storage listing for {}/{}", bucket, prefix);
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str::<Vec<StorageObject>>(&body)?)
    }
}
