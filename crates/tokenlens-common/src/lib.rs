//! Shared plumbing for the tokenlens CLIs.
//!
//! Two pieces live here: the contract-read layer (`starknet_call` with
//! selector and calldata fallbacks plus Cairo string decoding) and the
//! token URI resolution pipeline that turns a raw metadata pointer into
//! decoded JSON or text.

pub mod contract;
pub mod resolver;

use anyhow::{bail, Context, Result};
use starknet::core::types::U256;

pub use contract::ContractReader;
pub use resolver::{MetadataPayload, MetadataResolver, ResolveError, TokenUriScheme};

/// Parse a token id from its command-line form.
///
/// Accepts decimal (`1`) or 0x-prefixed hex (`0x2a`) up to 256 bits.
/// Decimal input is limited to 128 bits, which covers every token id
/// seen in the wild; larger ids can always be written in hex.
pub fn parse_u256(input: &str) -> Result<U256> {
    if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid token id {input:?}");
        }
        if hex.len() <= 32 {
            let low = u128::from_str_radix(hex, 16)
                .with_context(|| format!("invalid token id {input:?}"))?;
            return Ok(U256::from_words(low, 0));
        }
        let split = hex.len() - 32;
        let high = u128::from_str_radix(&hex[..split], 16)
            .with_context(|| format!("invalid token id {input:?}"))?;
        let low = u128::from_str_radix(&hex[split..], 16)
            .with_context(|| format!("invalid token id {input:?}"))?;
        return Ok(U256::from_words(low, high));
    }

    let low: u128 = input
        .parse()
        .with_context(|| format!("invalid token id {input:?}"))?;
    Ok(U256::from_words(low, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u256_decimal() {
        assert_eq!(parse_u256("1").unwrap(), U256::from(1u64));
        assert_eq!(parse_u256("123456789").unwrap(), U256::from(123_456_789u64));
    }

    #[test]
    fn test_parse_u256_hex() {
        assert_eq!(parse_u256("0x2a").unwrap(), U256::from(42u64));
        assert_eq!(parse_u256("0X2A").unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_parse_u256_hex_wide() {
        // 33 hex digits: one nibble lands in the high word
        let id = parse_u256("0x100000000000000000000000000000001").unwrap();
        assert_eq!(id, U256::from_words(1, 1));
    }

    #[test]
    fn test_parse_u256_rejects_garbage() {
        assert!(parse_u256("").is_err());
        assert!(parse_u256("0x").is_err());
        assert!(parse_u256("0xzz").is_err());
        assert!(parse_u256("-1").is_err());
        assert!(parse_u256("1.5").is_err());
    }
}
