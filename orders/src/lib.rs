//! Trade signal validation and translation into brokerage market orders.
//!
//! Core features:
//! - Field checks for inbound webhook signals (`stock`, `direction`, `trade_size`)
//! - Direct mapping to the `{symbol, qty, side, type, time_in_force}` order schema
//! - Size passthrough: the order quantity is the signal's `trade_size` verbatim

pub mod types;

pub use types::{Direction, OrderRequest, OrderType, Quantity, Side, TimeInForce};
pub mod signal;
pub use signal::{decode_payload, Advisory, Signal, SignalError};

impl OrderRequest {
    /// Builds a good-till-cancelled market order from a validated signal.
    ///
    /// `long` buys, every other direction sells.
    pub fn market(signal: &Signal) -> Self {
        Self {
            symbol: signal.stock.clone(),
            qty: signal.trade_size.clone(),
            side: signal.direction.side(),
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Gtc,
        }
    }
}
