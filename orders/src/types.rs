use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trade intent carried by a signal. Only the exact string `"long"` is long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short(String), // raw text kept for diagnostics
}

impl Direction {
    pub fn parse(raw: &str) -> Self {
        if raw == "long" {
            Direction::Long
        } else {
            Direction::Short(raw.to_string())
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Direction::Long => Side::Buy,
            Direction::Short(_) => Side::Sell,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::Long => "long",
            Direction::Short(raw) => raw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Gtc, // good till cancelled
}

/// Order size exactly as it arrived in the signal.
///
/// The value is forwarded to the brokerage untouched, so `10` stays an
/// integer and `"2.5"` stays a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(pub Value);

impl Quantity {
    /// Numeric view of the size, if the signal sent a number.
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }
}

/// Market order body for the brokerage order-creation endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: Quantity,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}
