//! tokenlens-metadata - Fetch and decode a token's metadata
//!
//! Reads the token's metadata pointer from the contract, resolves it
//! through the URI pipeline (base64 data URI, plain-text data URI,
//! IPFS gateway, HTTP), and prints the result: pretty-printed JSON for
//! structured metadata, verbatim text for inline plain-text schemes.

mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::Config;
use std::sync::Arc;
use tokenlens_common::{parse_u256, ContractReader, MetadataPayload, MetadataResolver};

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
        "Fetching metadata for token {} on contract {:#x}",
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

    let Some(uri) = reader.token_uri(contract, token_id).await? else {
        bail!("contract {contract:#x} returned no token URI for token {token_id}");
    };
    tracing::info!("Token URI: {uri}");

    let resolver = MetadataResolver::new().with_ipfs_gateway(config.ipfs_gateway.clone());

    match resolver.resolve(&uri).await? {
        MetadataPayload::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        MetadataPayload::Text(text) => println!("{text}"),
    }

    Ok(())
}
