use crate::config::ApiConfig;
use crate::error::{PorssiError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::prices::board::PriceQuote;
use crate::prices::slot::HourSlot;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;

/// Path of the single-hour price endpoint
pub const PRICE_PATH: &str = "/v1/price.json";

/// Per-slot price lookup
///
/// Implementations never fail: any problem resolves to
/// [`PriceQuote::Unavailable`].
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, slot: &HourSlot) -> PriceQuote;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: f64,
}

/// HTTP client for `api.porssisahko.net`
pub struct PorssisahkoClient {
    http: reqwest::Client,
    endpoint: String,
    logger: StructuredLogger,
}

impl PorssisahkoClient {
    /// Create a client from API settings
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.request_timeout_seconds))
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", cfg.base_url.trim_end_matches('/'), PRICE_PATH),
            logger: get_logger("client"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one slot, keeping the failure cause
    pub async fn try_fetch(&self, slot: &HourSlot) -> Result<f64> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("date", slot.date_param()), ("hour", slot.hour_param())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| PorssiError::network(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(PorssiError::invalid_response(format!(
                "HTTP {} for {}",
                status, slot
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| PorssiError::network(e.to_string()))?;
        if body.is_empty() {
            return Err(PorssiError::invalid_response(format!(
                "empty body for {}",
                slot
            )));
        }

        let parsed: PriceResponse =
            serde_json::from_slice(&body).map_err(|e| PorssiError::decode(e.to_string()))?;
        Ok(parsed.price)
    }
}

#[async_trait::async_trait]
impl PriceSource for PorssisahkoClient {
    async fn fetch(&self, slot: &HourSlot) -> PriceQuote {
        match self.try_fetch(slot).await {
            Ok(price) => {
                self.logger
                    .trace(&format!("Price for {}: {:.3} c/kWh", slot, price));
                PriceQuote::Price(price)
            }
            Err(e) => {
                self.logger
                    .warn(&format!("Price for {} unavailable: {}", slot, e));
                PriceQuote::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let cfg = ApiConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            ..ApiConfig::default()
        };
        let client = PorssisahkoClient::new(&cfg).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/v1/price.json");
    }

    #[test]
    fn decodes_only_numeric_price() {
        assert!(serde_json::from_str::<PriceResponse>(r#"{"price": 12.5}"#).is_ok());
        assert!(serde_json::from_str::<PriceResponse>(r#"{"price": 3}"#).is_ok());
        assert!(serde_json::from_str::<PriceResponse>(r#"{"prix": 5}"#).is_err());
        assert!(serde_json::from_str::<PriceResponse>(r#"{"price": "5"}"#).is_err());
        assert!(serde_json::from_str::<PriceResponse>(r#"{"price": null}"#).is_err());
    }
}
