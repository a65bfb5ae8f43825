use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Signal relay CLI - send trade signals to a running relay")]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a trade signal to the relay's webhook.
    Signal {
        #[arg(short = 's', long)]
        stock: String,
        #[arg(short = 'd', long, value_parser = parse_direction)]
        direction: String,
        #[arg(short = 'q', long, value_parser = parse_trade_size, allow_hyphen_values = true)]
        trade_size: serde_json::Number,
    },
    Health,
}

#[derive(Debug, Serialize)]
struct SignalRequest {
    stock: String,
    direction: String,
    trade_size: serde_json::Number,
}

fn parse_direction(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "long" | "buy" => Ok("long".to_string()),
        "short" | "sell" => Ok("short".to_string()),
        _ => Err(format!("Invalid direction: {}. Use 'long' or 'short'", s)),
    }
}

// Kept as a JSON number so `10` goes out as `10`, not `10.0`.
fn parse_trade_size(s: &str) -> Result<serde_json::Number, String> {
    s.parse::<serde_json::Number>()
        .map_err(|_| format!("Invalid trade size: {}", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Signal { stock, direction, trade_size } => {
            let request = SignalRequest { stock, direction, trade_size };

            let response = client
                .post(&format!("{}/webhook", cli.server))
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            let reply: serde_json::Value = response.json().await?;

            if status.is_success() {
                println!("Order placed ({})", status);
            } else {
                println!("Error: {}", status);
            }
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }

        Commands::Health => {
            let response = client
                .get(&format!("{}/health", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("Error: {}", response.status());
            }
        }
    }

    Ok(())
}
