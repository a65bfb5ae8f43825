//! Inbound trade signals and their validation rules.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::types::{Direction, Quantity};

/// Why a webhook body could not become a [`Signal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Body empty, unparseable, or not a populated JSON object.
    #[error("No JSON received")]
    NoData,
    /// One of `stock`, `direction`, `trade_size` absent or empty.
    #[error("Missing required fields")]
    MissingFields,
}

/// A validated trade signal. Lives for one request only.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub stock: String,
    pub direction: Direction,
    pub trade_size: Quantity,
}

/// Suspicious but accepted signal content. The relay reports these and
/// still forwards the order.
#[derive(Clone, Debug, PartialEq)]
pub enum Advisory {
    UnrecognizedDirection(String),
    NonPositiveSize(f64),
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnrecognizedDirection(raw) => {
                write!(f, "direction {raw:?} is neither \"long\" nor \"short\", routing as sell")
            }
            Advisory::NonPositiveSize(size) => write!(f, "trade_size {size} is not positive"),
        }
    }
}

impl Signal {
    /// Parses and validates a raw webhook body.
    pub fn from_json(body: &[u8]) -> Result<Self, SignalError> {
        Self::from_value(decode_payload(body)?)
    }

    /// Validates an already-decoded JSON value.
    ///
    /// `null`, non-objects and `{}` count as no data. Extra keys are ignored.
    pub fn from_value(value: Value) -> Result<Self, SignalError> {
        let Value::Object(mut fields) = value else {
            return Err(SignalError::NoData);
        };
        if fields.is_empty() {
            return Err(SignalError::NoData);
        }

        let stock = non_empty_string(fields.remove("stock"));
        let direction = non_empty_string(fields.remove("direction"));
        let trade_size = fields.remove("trade_size").filter(|v| !v.is_null());

        match (stock, direction, trade_size) {
            (Some(stock), Some(direction), Some(trade_size)) => Ok(Signal {
                stock,
                direction: Direction::parse(&direction),
                trade_size: Quantity(trade_size),
            }),
            _ => Err(SignalError::MissingFields),
        }
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        let mut found = Vec::new();

        if let Direction::Short(raw) = &self.direction {
            if raw != "short" {
                found.push(Advisory::UnrecognizedDirection(raw.clone()));
            }
        }
        if let Some(size) = self.trade_size.as_f64() {
            if size <= 0.0 {
                found.push(Advisory::NonPositiveSize(size));
            }
        }

        found
    }
}

/// Decodes a webhook body into a populated JSON object.
///
/// Empty bodies, invalid JSON, `null`, non-objects and `{}` are all
/// [`SignalError::NoData`]. Field presence is not checked here.
pub fn decode_payload(body: &[u8]) -> Result<Value, SignalError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SignalError::NoData);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) if !fields.is_empty() => Ok(Value::Object(fields)),
        _ => Err(SignalError::NoData),
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
