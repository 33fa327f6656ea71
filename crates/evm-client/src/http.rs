//! HTTP collaborator interface
//!
//! The SDK assumes nothing about retry policy: any rejection from the
//! client is a fetch failure, classified by the caller.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use causeway_core::ClientError;

/// Narrow GET-only HTTP interface consumed by REST provider adapters
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with query parameters, decoding the body as JSON
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError>;
}

/// Decode a JSON response into a typed model.
///
/// Models use `Option` fields for everything the API does not guarantee, so
/// a missing optional field degrades precision instead of failing here.
pub async fn get_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    url: &str,
    params: &[(&str, String)],
) -> Result<T, ClientError> {
    let value = client.get(url, params).await?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Production client backed by `reqwest`
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http(format!("{url} returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
