//! Traffic Signal
//!
//! Runs the signal in real time on tokio and prints each phase entry.
//! A pedestrian request is raised during the first Green, so the second
//! Green is shortened and the Red before it lengthened.
//!
//! Optional: point SIGNAL_CONFIG at a JSON file to override timings.
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_signal

use signal_cycle::{MachineBuilder, Phase, SignalConfig, TokioScheduler};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = match std::env::var("SIGNAL_CONFIG") {
        Ok(path) => SignalConfig::from_json(&std::fs::read_to_string(path)?)?,
        Err(_) => SignalConfig::default(),
    };

    println!("=== Traffic Signal ===\n");

    let machine = MachineBuilder::new()
        .scheduler(TokioScheduler::new()?)
        .config(config)
        .observer(|phase| {
            let lamp = match phase {
                Phase::Green => "[ ] [ ] [G]",
                Phase::Yellow => "[ ] [Y] [ ]",
                Phase::Red => "[R] [ ] [ ]",
            };
            println!("{lamp}  {phase}");
        })
        .build()?;

    machine.start();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    println!("  pedestrian button pressed");
    machine.request_pedestrian();

    tokio::time::sleep(Duration::from_secs(20)).await;

    machine.stop();
    println!("  stop requested, finishing current phase");
    tokio::time::sleep(Duration::from_secs(7)).await;

    println!("\nRecent phases:");
    for entry in machine.history().entries() {
        println!(
            "  {:<6} {:>5} ms{}",
            entry.phase.name(),
            entry.dwell_ms,
            if entry.pedestrian { "  (pedestrian)" } else { "" }
        );
    }

    println!("\nSnapshot:\n{}", machine.snapshot().to_json()?);
    println!("\n=== Example Complete ===");
    Ok(())
}
