// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use axiom::backends::local::{
    FeedbackRegenerator, HeuristicCritic, InMemoryTokenStore, LogCommitter, StructuralValidator,
};
use axiom::config::load_and_validate_config;
use axiom::nets::factory::{Collaborators, NetFactory};
use axiom::observability::messages::config::ConfigLoaded;
use axiom::observability::messages::StructuredLog;
use axiom::traits::TokenStore;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <config.yaml> <payload.json>", args[0]);
        eprintln!("Example: {} configs/critique.yaml demos/aspirin.json", args[0]);
        std::process::exit(1);
    }
    let (config_file, payload_file) = (&args[1], &args[2]);

    let start_time = Instant::now();
    let config = load_and_validate_config(config_file)?;
    ConfigLoaded {
        path: config_file,
        net: config.net.as_str(),
    }
    .log();

    let raw = std::fs::read_to_string(payload_file)
        .with_context(|| format!("failed to read payload file '{}'", payload_file))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("'{}' is not valid JSON", payload_file))?;

    let store = Arc::new(InMemoryTokenStore::new());
    let collaborators = Collaborators::default()
        .with_validator(Arc::new(StructuralValidator))
        .with_regenerator(Arc::new(FeedbackRegenerator))
        .with_committer(Arc::new(LogCommitter))
        .with_critic(Arc::new(HeuristicCritic))
        .with_store(store.clone());
    let mut net = NetFactory::from_config(&config, collaborators)?;

    println!("🚀 AXIOM {} net", config.net.as_str());
    println!("═══════════════════════════════════");
    println!("Config:  {}", config_file);
    println!("Payload: {}", payload_file);
    println!();

    let result = net.submit(payload).await;

    net.flush().await;
    let removed = store.cleanup(config.store.retention_days).await?;
    let audited = store.len().await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!();
    println!(
        "{} {} in {:?}: {} step(s), {} retr{}, {} token snapshot(s) audited, {} expired",
        if result.success { "✅" } else { "❌" },
        result.outcome.as_str(),
        start_time.elapsed(),
        result.total_steps,
        result.total_retries,
        if result.total_retries == 1 { "y" } else { "ies" },
        audited,
        removed
    );

    if !result.success {
        std::process::exit(2);
    }
    Ok(())
}
