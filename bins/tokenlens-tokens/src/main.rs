//! tokenlens-tokens - Enumerate tokens held by a wallet
//!
//! Reads `balance_of(wallet)` to learn how many tokens the wallet
//! holds, then issues every `token_of_owner_by_index(wallet, i)` read
//! as a single JSON-RPC batch. Responses come back in request order,
//! and the printed list is sorted ascending.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use std::sync::Arc;
use tokenlens_common::ContractReader;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let config = Config::parse();
    let contract = config.contract_address()?;
    let wallet = config.wallet_address()?;

    tracing::info!(
        "Listing tokens on contract {:#x} owned by {:#x}",
        contract,
        wallet
    );

    let provider = Arc::new(starknet::providers::jsonrpc::JsonRpcClient::new(
        starknet::providers::jsonrpc::HttpTransport::new(
            url::Url::parse(&config.rpc_url).context("Invalid RPC URL")?,
        ),
    ));
    let reader = ContractReader::new(provider);

    let block = reader.block_number().await?;
    tracing::info!("Connected to node with latest block: {block}");

    let mut tokens = reader.tokens_of_owner(contract, wallet).await?;
    println!("Account {:#x} has {} token(s).", wallet, tokens.len());

    if !tokens.is_empty() {
        tokens.sort_by_key(|id| (id.high(), id.low()));
        let ids: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        println!("Account {:#x} owns tokens: {}", wallet, ids.join(", "));
    }

    Ok(())
}
