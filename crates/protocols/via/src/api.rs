//! Via REST API client

use std::sync::Arc;

use rust_decimal::Decimal;

use causeway_core::ClientError;
use evm_client::{get_json, HttpClient};

use crate::models::{ViaBuildTxResponse, ViaPagesResponse, ViaRoutesRequest, ViaRoutesResponse};

pub const DEFAULT_ROUTER_URL: &str = "https://router-api.via.exchange";
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer-api.via.exchange";
pub const DEFAULT_API_KEY: &str = "e3db93a3-ae1c-41e5-8229-b8c1ecef5583";

#[derive(Clone)]
pub struct ViaApi {
    http: Arc<dyn HttpClient>,
    router_url: String,
    explorer_url: String,
    api_key: String,
}

impl ViaApi {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            router_url: DEFAULT_ROUTER_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }

    /// Number of result pages the discovery API will serve
    pub async fn routes_pages(&self) -> Result<u32, ClientError> {
        let url = format!("{}/api/v2/routes/pages", self.router_url);
        let response: ViaPagesResponse = get_json(
            &*self.http,
            &url,
            &[("apiKey", self.api_key.clone())],
        )
        .await?;
        Ok(response.pages.max(1))
    }

    /// One page of candidate routes
    pub async fn get_routes(
        &self,
        request: &ViaRoutesRequest,
        offset: u32,
    ) -> Result<ViaRoutesResponse, ClientError> {
        let url = format!("{}/api/v1/routes", self.router_url);
        let mut params = request.to_query(offset);
        params.push(("apiKey", self.api_key.clone()));
        get_json(&*self.http, &url, &params).await
    }

    /// Build the transaction executing `route_id`
    pub async fn build_tx(
        &self,
        route_id: &str,
        from_address: &str,
        receive_address: &str,
        num_action: u32,
    ) -> Result<ViaBuildTxResponse, ClientError> {
        let url = format!("{}/api/v2/send/tx", self.router_url);
        get_json(
            &*self.http,
            &url,
            &[
                ("routeId", route_id.to_string()),
                ("fromAddress", from_address.to_string()),
                ("receiveAddress", receive_address.to_string()),
                ("numAction", num_action.to_string()),
                ("apiKey", self.api_key.clone()),
            ],
        )
        .await
    }

    /// USD prices for tokens on `chain_id`, positionally matching
    /// `addresses`. `None` where the price service does not know a token.
    pub async fn token_prices(
        &self,
        chain_id: u64,
        addresses: &[String],
    ) -> Result<Vec<Option<Decimal>>, ClientError> {
        let url = format!("{}/api/v1/token_price", self.explorer_url);
        let response: serde_json::Value = self
            .http
            .get(
                &url,
                &[
                    ("chain", chain_id.to_string()),
                    ("tokens_addresses", addresses.join(",")),
                ],
            )
            .await?;

        let by_chain = &response[chain_id.to_string()];
        Ok(addresses
            .iter()
            .map(|address| {
                by_chain[address]["USD"]
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .or_else(|| {
                        by_chain[address]["USD"]
                            .as_f64()
                            .and_then(|f| Decimal::try_from(f).ok())
                    })
            })
            .collect())
    }
}
