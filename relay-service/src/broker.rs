//! Outbound client for the brokerage order-creation endpoint.

use orders::OrderRequest;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const API_KEY_HEADER: &str = "APCA-API-KEY-ID";
pub const API_SECRET_HEADER: &str = "APCA-API-SECRET-KEY";
const ORDERS_PATH: &str = "/v2/orders";

#[derive(Debug, Error)]
pub enum BrokerError {
    /// Brokerage answered with anything other than 200.
    #[error("brokerage rejected order with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// 200 status but the body was not JSON.
    #[error("brokerage returned an unreadable body: {body}")]
    InvalidResponse { body: String },
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("brokerage request failed: {0}")]
    Transport(String),
}

impl BrokerError {
    /// Text surfaced to the webhook caller. Brokerage bodies are returned verbatim.
    pub fn details(&self) -> String {
        match self {
            BrokerError::Rejected { body, .. } | BrokerError::InvalidResponse { body } => {
                body.clone()
            }
            BrokerError::Transport(message) => message.clone(),
        }
    }
}

/// Places market orders with the brokerage REST API.
///
/// Holds no per-request state, so one instance is shared by every handler.
#[derive(Clone)]
pub struct AlpacaClient {
    http: Client,
    orders_url: String,
    api_key: String,
    secret_key: String,
}

impl AlpacaClient {
    pub fn new(config: &Config) -> Result<Self, BrokerError> {
        let http = Client::builder()
            .timeout(config.broker_timeout)
            .build()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            orders_url: format!("{}{}", config.base_url, ORDERS_PATH),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    pub fn orders_url(&self) -> &str {
        &self.orders_url
    }

    /// Submits one order and returns the brokerage's JSON reply.
    ///
    /// Single attempt, no retry. Only status 200 counts as accepted.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<Value, BrokerError> {
        let response = self
            .http
            .post(&self.orders_url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(API_SECRET_HEADER, self.secret_key.as_str())
            .json(order)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        debug!(status, %body, "Brokerage response");

        if status != 200 {
            return Err(BrokerError::Rejected { status, body });
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(details) => Ok(details),
            Err(_) => Err(BrokerError::InvalidResponse { body }),
        }
    }
}
