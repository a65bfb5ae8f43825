//! Signal Relay Translation Lab
//!
//! Measures how long signal validation and order translation take, then
//! walks through the webhook-to-order mapping for a few sample signals.

use orders::{OrderRequest, Signal};


/// Main entry point - runs latency tests and demo.
fn main() {
    println!("=== Signal Relay Translation Lab ===");

    latency_test::run_latency_tests();
    latency_test::run_throughput_test();

    println!("\n=== Basic Demo ===");
    run_basic_demo();
}

/// Shows how sample webhook bodies become brokerage orders (or are refused).
fn run_basic_demo() {
    let samples: [&[u8]; 5] = [
        br#"{"stock":"AAPL","direction":"long","trade_size":10}"#,
        br#"{"stock":"TSLA","direction":"short","trade_size":2.5}"#,
        br#"{"stock":"NVDA","direction":"flat","trade_size":0}"#,
        br#"{"stock":"MSFT","direction":"long"}"#,
        b"",
    ];

    for body in samples {
        println!("Webhook body: {}", String::from_utf8_lossy(body));

        match Signal::from_json(body) {
            Ok(signal) => {
                for advisory in signal.advisories() {
                    println!("  Advisory: {}", advisory);
                }
                let order = OrderRequest::market(&signal);
                match serde_json::to_string(&order) {
                    Ok(json) => println!("  Order: {}", json),
                    Err(e) => println!("  Could not encode order: {}", e),
                }
            }
            Err(e) => println!("  Rejected: {}", e),
        }
    }
}
