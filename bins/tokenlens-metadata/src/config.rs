//! Configuration for the metadata fetcher.

use anyhow::Result;
use clap::Parser;
use starknet::core::types::Felt;
use tokenlens_common::resolver::IPFS_GATEWAY;

/// Loot Survivor adventurers, whose token URIs are inline base64 JSON.
const DEFAULT_CONTRACT: &str =
    "0x018108b32cea514a78ef1b0e4a0753e855cdf620bc0565202c02456f618c4dc4";

/// Fetch and decode a token's metadata
///
/// Reads `token_uri(token_id)` from the contract, classifies the
/// returned URI (inline base64 JSON, inline plain text, IPFS, HTTP),
/// and prints the decoded metadata.
///
/// # Examples
///
/// ```bash
/// # Default example contract and token
/// tokenlens-metadata
///
/// # Specific contract and token
/// tokenlens-metadata 0x05dbdedc203e92749e2e746e2d40a768d966bd243df04a6b712e222bc040a9af 42
/// ```
#[derive(Parser, Debug)]
#[command(name = "tokenlens-metadata")]
#[command(about = "Fetch and decode a token's metadata", long_about = None)]
pub struct Config {
    /// NFT contract address (hex)
    #[arg(default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Token id, decimal or 0x-hex
    #[arg(default_value = "1")]
    pub token_id: String,

    /// Starknet RPC URL
    #[arg(long, env = "STARKNET_RPC_URL", default_value = "http://localhost:5050")]
    pub rpc_url: String,

    /// IPFS gateway base used to dereference ipfs:// URIs
    #[arg(long, default_value = IPFS_GATEWAY)]
    pub ipfs_gateway: String,
}

impl Config {
    /// Parse the contract address argument to a Felt
    pub fn contract_address(&self) -> Result<Felt> {
        Felt::from_hex(&self.contract)
            .map_err(|e| anyhow::anyhow!("Invalid address {}: {e}", self.contract))
    }
}
