//! HTTP table client
//!
//! Speaks the REST dialect of the hosted data service:
//! `GET /rest/v1/{table}?select=..&field=eq.value&order=field.asc`,
//! `POST /rest/v1/{table}` and `PATCH /rest/v1/{table}?field=eq.value`.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use shared::{Filter, TableQuery};

use super::TableClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Error body returned by the data service
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Network table client
#[derive(Debug, Clone)]
pub struct RestTableClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RestTableClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            access_token: None,
        })
    }

    /// Act on behalf of a signed-in user
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Query-string pairs for a select
    pub(crate) fn select_params(query: &TableQuery) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            query
                .columns
                .as_deref()
                .map(|c| c.replace(' ', ""))
                .unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(Self::filter_params(&query.filters));
        if let Some(field) = &query.order_by {
            params.push(("order".to_string(), format!("{field}.asc")));
        }
        params
    }

    pub(crate) fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|f| (f.field.clone(), format!("eq.{}", f.value)))
            .collect()
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
            return Err(ClientError::Api {
                code: api_err.code.unwrap_or_else(|| status.as_u16().to_string()),
                message: api_err.message,
                details: api_err.details,
                hint: api_err.hint,
            });
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(text)),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
            _ => Err(ClientError::Internal(format!("{status}: {text}"))),
        }
    }
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn select(&self, query: &TableQuery) -> ClientResult<Vec<Value>> {
        tracing::debug!(table = %query.table, filters = query.filters.len(), "select");
        let request = self
            .client
            .get(self.table_url(&query.table))
            .query(&Self::select_params(query));
        let response = self.authorize(request).send().await?;
        let rows = Self::check(response).await?.json::<Vec<Value>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<()> {
        tracing::debug!(table, "insert");
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&row);
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update(&self, table: &str, values: Value, filters: &[Filter]) -> ClientResult<()> {
        tracing::debug!(table, filters = filters.len(), "update");
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&Self::filter_params(filters))
            .header("Prefer", "return=minimal")
            .json(&values);
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
