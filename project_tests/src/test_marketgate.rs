//! # Market Calendar Gate Probe
//!
//! Prints the gate decision for the current moment and for the session
//! boundaries of today's exchange-local date.

use chrono::{Datelike, TimeZone, Utc};
use lib_common::{AlerterConfig, MarketCalendarGate};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AlerterConfig::load(None)?;
    let gate = MarketCalendarGate::from_config(&config)?;
    let zone = config.timezone()?;

    let now = Utc::now();
    let local = now.with_timezone(&zone);
    println!("[*] Exchange local time: {}", local.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("[*] Market open now:     {}", gate.is_open_now());

    // Boundary probes for today's local date.
    let today = local.date_naive();
    for (label, hour, minute) in [
        ("09:44 (pre-window) ", 9u32, 44u32),
        ("09:45 (window open)", 9, 45),
        ("16:00 (window close)", 16, 0),
        ("16:01 (post-window)", 16, 1),
    ] {
        let probe = zone
            .with_ymd_and_hms(today.year(), today.month(), today.day(), hour, minute, 0)
            .single();
        match probe {
            Some(instant) => println!(
                "    {} -> {}",
                label,
                gate.is_open_at(instant.with_timezone(&Utc))
            ),
            None => println!("    {} -> ambiguous local time", label),
        }
    }

    Ok(())
}
