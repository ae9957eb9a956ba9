//! # RSI Feed Live Data Test
//!
//! Fetches one reading from the configured RSI endpoint and displays the
//! extracted fields. Network-touching; run by hand, not under `cargo test`.

use lib_common::{AlerterConfig, RsiFeed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AlerterConfig::load(None)?;
    let feed = RsiFeed::new(&config)?;

    println!("[*] Requesting live data from {} ...", config.rsi_api_url);

    match feed.fetch_reading().await {
        Ok(reading) => {
            println!("\n[SUCCESS] Reading extracted:");
            println!("-----------------------------------------------");
            println!("{}", serde_json::to_string_pretty(&reading)?);
            println!("-----------------------------------------------");
            match reading.rsi {
                Some(rsi) if rsi < config.rsi_threshold => {
                    println!("[INFO] Below threshold {} - an alert would fire", config.rsi_threshold)
                }
                Some(rsi) => {
                    println!("[INFO] {} is at or above threshold {}", rsi, config.rsi_threshold)
                }
                None => println!("[WARN] Payload carried no numeric RSI"),
            }
        }
        Err(e) => {
            eprintln!("\n[ERROR] Indicator retrieval failed:");
            eprintln!(">>> {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
