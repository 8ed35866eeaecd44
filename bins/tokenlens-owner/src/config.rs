//! Configuration for the owner lookup.

use anyhow::Result;
use clap::Parser;
use starknet::core::types::Felt;

/// Starknet ID identity NFTs.
const DEFAULT_CONTRACT: &str =
    "0x05dbdedc203e92749e2e746e2d40a768d966bd243df04a6b712e222bc040a9af";

/// Resolve a token's current owner
///
/// Reads `owner_of(token_id)` from the contract and prints the owning
/// address.
///
/// # Examples
///
/// ```bash
/// # Default example contract and token
/// tokenlens-owner
///
/// # Specific contract and token
/// tokenlens-owner 0x018108b32cea514a78ef1b0e4a0753e855cdf620bc0565202c02456f618c4dc4 7
/// ```
#[derive(Parser, Debug)]
#[command(name = "tokenlens-owner")]
#[command(about = "Resolve a token's current owner", long_about = None)]
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
}

impl Config {
    /// Parse the contract address argument to a Felt
    pub fn contract_address(&self) -> Result<Felt> {
        Felt::from_hex(&self.contract)
            .map_err(|e| anyhow::anyhow!("Invalid address {}: {e}", self.contract))
    }
}
