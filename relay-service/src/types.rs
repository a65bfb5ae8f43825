//! JSON bodies returned by the relay's HTTP endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ORDER_PLACED: &str = "Order placed successfully!";
pub const ORDER_FAILED: &str = "Failed to place order";
pub const INVALID_CONTENT_TYPE: &str = "Invalid Content-Type. Expected application/json";

/// Successful webhook reply; `order_details` is the brokerage body unchanged.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub message: String,
    pub order_details: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String, // "paper" or "live"
    pub timestamp: u128,
}
