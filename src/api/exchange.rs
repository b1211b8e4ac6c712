// ============================================================================
// API Client : Taux de change
// ============================================================================
// Récupère les taux du jour, tous exprimés par rapport à l'USD
//
// Format attendu : { "base": "USD", "rates": { "GBP": 0.79, ... } }
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::USER_AGENT;
use crate::error::{FxError, FxResult};
use crate::models::ExchangeRateTable;

/// Source de taux de change (base USD)
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> FxResult<ExchangeRateTable>;
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Client reqwest pour exchangerate-api.com (ou compatible)
#[derive(Debug, Clone)]
pub struct ExchangeRateApiProvider {
    client: reqwest::Client,
    url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(url: impl Into<String>) -> FxResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_rates(&self) -> FxResult<ExchangeRateTable> {
        debug!("Sending exchange rate request");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "Rate provider returned error status");
            return Err(FxError::Status {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| FxError::Decode(e.to_string()))?;

        if body.rates.is_empty() {
            return Err(FxError::Decode("rate table is empty".to_string()));
        }

        info!(currencies = body.rates.len(), "Fetched exchange rates");
        Ok(ExchangeRateTable::from_rates(body.rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_rates() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v4/latest/USD");
            then.status(200).json_body(json!({
                "base": "USD",
                "date": "2026-10-15",
                "rates": {"USD": 1, "GBP": 0.79, "NGN": 1550.25}
            }));
        });

        let provider = ExchangeRateApiProvider::new(server.url("/v4/latest/USD")).unwrap();
        let table = provider.fetch_rates().await.unwrap();

        mock.assert();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rate("NGN"), 1550.25);
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest");
            then.status(500);
        });

        let provider = ExchangeRateApiProvider::new(server.url("/latest")).unwrap();
        let err = provider.fetch_rates().await.unwrap_err();
        assert!(matches!(err, FxError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_rates_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest");
            then.status(200).json_body(json!({"result": "error", "error-type": "quota-reached"}));
        });

        let provider = ExchangeRateApiProvider::new(server.url("/latest")).unwrap();
        let err = provider.fetch_rates().await.unwrap_err();
        assert!(matches!(err, FxError::Decode(_)));
    }
}
