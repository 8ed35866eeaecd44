//! Configuration for the wallet token enumeration.

use anyhow::Result;
use clap::Parser;
use starknet::core::types::Felt;

/// Starknet ID identity NFTs.
const DEFAULT_CONTRACT: &str =
    "0x05dbdedc203e92749e2e746e2d40a768d966bd243df04a6b712e222bc040a9af";

/// Example wallet holding a few identity tokens.
const DEFAULT_WALLET: &str =
    "0x02a0a8f3b6097e7a6bd7649deb30715323072a159c0e6b71b689bd245c146cc0";

/// Enumerate tokens held by a wallet
///
/// Reads `balance_of(wallet)`, then fetches every
/// `token_of_owner_by_index(wallet, i)` in one JSON-RPC batch and
/// prints the sorted token-id list.
///
/// # Examples
///
/// ```bash
/// # Default example contract and wallet
/// tokenlens-tokens
///
/// # Specific contract and wallet
/// tokenlens-tokens 0x05dbdedc203e92749e2e746e2d40a768d966bd243df04a6b712e222bc040a9af 0x0123...
/// ```
#[derive(Parser, Debug)]
#[command(name = "tokenlens-tokens")]
#[command(about = "Enumerate tokens held by a wallet", long_about = None)]
pub struct Config {
    /// NFT contract address (hex)
    #[arg(default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Wallet address to enumerate (hex)
    #[arg(default_value = DEFAULT_WALLET)]
    pub wallet: String,

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

    /// Parse the wallet address argument to a Felt
    pub fn wallet_address(&self) -> Result<Felt> {
        Felt::from_hex(&self.wallet)
            .map_err(|e| anyhow::anyhow!("Invalid address {}: {e}", self.wallet))
    }
}
