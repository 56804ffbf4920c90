//! Builds a ledger, appends payloads, and prints every block.
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use powchain_core::constants::{DEFAULT_DIFFICULTY_BITS, DEFAULT_MAX_NONCE};
use powchain_core::{Block, Ledger, PowConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Mine a small proof-of-work ledger and print its blocks")]
struct Cli {
    /// Leading zero bits every block hash must have
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY_BITS)]
    difficulty: u32,

    /// Exclusive upper bound of the nonce search
    #[arg(long, default_value_t = DEFAULT_MAX_NONCE)]
    max_nonce: u64,

    /// Print blocks as a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Payloads to append after the genesis block
    #[arg(default_values_t = [
        "Send 1 BTC to Ivan".to_string(),
        "Send 2 BTC to Ivan".to_string(),
    ])]
    payloads: Vec<String>,
}

#[derive(Serialize)]
struct BlockView {
    timestamp: i64,
    previous_hash: String,
    data: String,
    hash: String,
    nonce: u64,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        Self {
            timestamp: block.timestamp(),
            previous_hash: hex::encode(block.previous_hash()),
            data: String::from_utf8_lossy(block.payload()).into_owned(),
            hash: hex::encode(block.hash()),
            nonce: block.nonce(),
        }
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PowConfig {
        difficulty_bits: cli.difficulty,
        max_nonce: cli.max_nonce,
    };

    let mut ledger = Ledger::with_config(config).context("failed to mine genesis block")?;

    let started = Instant::now();
    for payload in &cli.payloads {
        ledger
            .append(payload.as_bytes())
            .with_context(|| format!("failed to append {payload:?}"))?;
    }
    let elapsed = started.elapsed();

    ledger.verify().context("ledger failed verification")?;
    info!(blocks = ledger.len(), ?elapsed, "ledger verified");

    if cli.json {
        let views: Vec<BlockView> = ledger.iter().map(BlockView::from).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for view in ledger.iter().map(BlockView::from) {
        println!("Pre.Hash: {}", view.previous_hash);
        println!("Data    : {}", view.data);
        println!("Hash    : {}", view.hash);
        println!("Nonce   : {}", view.nonce);
        println!();
    }
    println!("Elapsed : {elapsed:?}");
    Ok(())
}
