//! # Poster swap walkthrough
//!
//! Cycles through all nine strategies, running each canned scenario and
//! waiting for its completion before moving on. Every event is printed by
//! [`LogWriter`], so the output shows which context each task ran on and
//! which poster it read back.
//!
//! ```bash
//! cargo run --example poster_swap --features logging
//! ```
//!
//! Ctrl-C stops the walkthrough early and drains the lanes.

use std::sync::Arc;
use std::time::Duration;

use posterswap::{
    Config, ConcurrencyStrategy, EventKind, LogWriter, StrategyRunner, Subscribe, shutdown_signal,
};

async fn walk(runner: &StrategyRunner) -> Result<(), Box<dyn std::error::Error>> {
    let mut rx = runner.bus().subscribe();
    for _ in 0..ConcurrencyStrategy::COUNT {
        let strategy = runner.current_strategy();
        println!("\n=== {strategy} ===");

        let run = runner.run_fixed_scenario().await?;
        loop {
            let ev = rx.recv().await?;
            if ev.kind == EventKind::ScenarioCompleted && ev.is_run(run) {
                break;
            }
        }
        // let the subscriber worker flush before the next banner
        tokio::time::sleep(Duration::from_millis(20)).await;
        runner.advance_strategy();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config {
        latency_unit: Duration::from_millis(50),
        grace: Duration::from_secs(5),
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let runner = StrategyRunner::builder(cfg).with_subscribers(subs).build();

    tokio::select! {
        res = walk(&runner) => res?,
        _ = shutdown_signal() => println!("\ninterrupted"),
    }

    runner.shutdown().await?;
    println!("\nfinal poster: {}", runner.store().read());
    Ok(())
}
