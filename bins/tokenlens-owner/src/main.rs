//! tokenlens-owner - Resolve a token's current owner
//!
//! A single read call: `owner_of(token_id)` (with the camelCase
//! `ownerOf` fallback), printed as a hex address.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use std::sync::Arc;
use tokenlens_common::{parse_u256, ContractReader};

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
    let token_id = parse_u256(&config.token_id)?;

    tracing::info!(
        "Checking owner of token {} on contract {:#x}",
        token_id,
        contract
    );

    let provider = Arc::new(starknet::providers::jsonrpc::JsonRpcClient::new(
        starknet::providers::jsonrpc::HttpTransport::new(
            url::Url::parse(&config.rpc_url).context("Invalid RPC URL")?,
        ),
    ));
    let reader = ContractReader::new(provider);

    let block = reader.block_number().await?;
    tracing::info!("Connected to node with latest block: {block}");

    let owner = reader.owner_of(contract, token_id).await?;
    println!("Token {token_id} is owned by: {owner:#x}");

    Ok(())
}
