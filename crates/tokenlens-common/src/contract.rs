//! Read-only NFT contract calls over Starknet JSON-RPC.
//!
//! Cairo contracts expose snake_case or camelCase entrypoints depending
//! on compiler era, and take token ids either as a u256 `(low, high)`
//! pair or a single felt. Every read here walks those shapes in order
//! and returns the first decodable result. String returns are decoded
//! from packed short strings, Cairo ByteArrays, or legacy felt arrays.

use anyhow::{bail, Context, Result};
use starknet::core::types::{requests::CallRequest, BlockId, BlockTag, Felt, FunctionCall, U256};
use starknet::macros::selector;
use starknet::providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet::providers::{Provider, ProviderRequestData, ProviderResponseData};
use std::sync::Arc;

/// Upper bound on the felt count of a decoded string. Anything larger
/// is assumed to be a misinterpreted return value, not a string.
const MAX_STRING_FELTS: usize = 100;

/// Issues `starknet_call` reads against an NFT contract.
///
/// All reads are pinned to the latest block.
pub struct ContractReader {
    provider: Arc<JsonRpcClient<HttpTransport>>,
}

impl ContractReader {
    pub fn new(provider: Arc<JsonRpcClient<HttpTransport>>) -> Self {
        Self { provider }
    }

    /// Latest block number, used as a connectivity probe after startup.
    pub async fn block_number(&self) -> Result<u64> {
        self.provider
            .block_number()
            .await
            .context("failed to query latest block number")
    }

    /// Read `token_uri(token_id)` / `tokenURI(token_id)`.
    ///
    /// Returns `None` when every selector and calldata shape yields
    /// empty or undecodable data.
    pub async fn token_uri(&self, contract: Felt, token_id: U256) -> Result<Option<String>> {
        for calldata in token_id_shapes(token_id) {
            for sel in [selector!("token_uri"), selector!("tokenURI")] {
                if let Some(felts) = self.try_call(contract, sel, calldata.clone()).await {
                    if let Some(uri) = decode_cairo_string(&felts) {
                        if !uri.is_empty() {
                            return Ok(Some(uri));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    /// Read `owner_of(token_id)` / `ownerOf(token_id)`.
    pub async fn owner_of(&self, contract: Felt, token_id: U256) -> Result<Felt> {
        for calldata in token_id_shapes(token_id) {
            for sel in [selector!("owner_of"), selector!("ownerOf")] {
                if let Some(felts) = self.try_call(contract, sel, calldata.clone()).await {
                    if let Some(&owner) = felts.first() {
                        return Ok(owner);
                    }
                }
            }
        }
        bail!("owner_of({token_id}) reverted or returned no data on {contract:#x}")
    }

    /// Read `balance_of(wallet)` / `balanceOf(wallet)`.
    pub async fn balance_of(&self, contract: Felt, wallet: Felt) -> Result<U256> {
        for sel in [selector!("balance_of"), selector!("balanceOf")] {
            if let Some(felts) = self.try_call(contract, sel, vec![wallet]).await {
                if !felts.is_empty() {
                    return Ok(parse_u256_felts(&felts));
                }
            }
        }
        bail!("balance_of({wallet:#x}) reverted or returned no data on {contract:#x}")
    }

    /// Enumerate the wallet's tokens via `token_of_owner_by_index`.
    ///
    /// Reads the balance first, then issues all index reads as a single
    /// JSON-RPC batch. Responses come back in request order, so the
    /// result is already index-aligned. Falls back to the camelCase
    /// selector when the whole batch fails.
    pub async fn tokens_of_owner(&self, contract: Felt, wallet: Felt) -> Result<Vec<U256>> {
        let balance = self.balance_of(contract, wallet).await?;
        if balance.high() != 0 {
            bail!("balance {balance} of {wallet:#x} is too large to enumerate");
        }
        let count = usize::try_from(balance.low())
            .with_context(|| format!("balance {balance} of {wallet:#x} is too large to enumerate"))?;
        if count == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!(
            target: "tokenlens_common::contract",
            contract = %format!("{contract:#x}"),
            wallet = %format!("{wallet:#x}"),
            count,
            "enumerating owned tokens"
        );

        match self
            .indices_batch(contract, wallet, count, selector!("token_of_owner_by_index"))
            .await
        {
            Ok(tokens) => Ok(tokens),
            Err(snake_err) => {
                match self
                    .indices_batch(contract, wallet, count, selector!("tokenOfOwnerByIndex"))
                    .await
                {
                    Ok(tokens) => Ok(tokens),
                    // The snake_case error is the more likely diagnosis on Cairo 1 contracts.
                    Err(_) => Err(snake_err),
                }
            }
        }
    }

    /// One batched `starknet_call` per index in `0..count`.
    async fn indices_batch(
        &self,
        contract: Felt,
        wallet: Felt,
        count: usize,
        sel: Felt,
    ) -> Result<Vec<U256>> {
        let requests: Vec<ProviderRequestData> = (0..count)
            .map(|index| {
                ProviderRequestData::Call(CallRequest {
                    request: FunctionCall {
                        contract_address: contract,
                        entry_point_selector: sel,
                        // token_of_owner_by_index(owner, index) with index as u256
                        calldata: vec![wallet, Felt::from(index as u64), Felt::ZERO],
                    },
                    block_id: BlockId::Tag(BlockTag::Latest),
                })
            })
            .collect();

        let responses = self
            .provider
            .batch_requests(&requests)
            .await
            .context("failed to execute batch token_of_owner_by_index requests")?;

        let mut tokens = Vec::with_capacity(count);
        for (index, response) in responses.into_iter().enumerate() {
            match response {
                ProviderResponseData::Call(felts) if !felts.is_empty() => {
                    tokens.push(parse_u256_felts(&felts));
                }
                ProviderResponseData::Call(_) => {
                    bail!("token_of_owner_by_index({index}) returned no data on {contract:#x}")
                }
                _ => bail!("unexpected response type for token_of_owner_by_index({index})"),
            }
        }
        Ok(tokens)
    }

    async fn try_call(&self, contract: Felt, sel: Felt, calldata: Vec<Felt>) -> Option<Vec<Felt>> {
        let call = FunctionCall {
            contract_address: contract,
            entry_point_selector: sel,
            calldata,
        };

        match self.provider.call(call, BlockId::Tag(BlockTag::Latest)).await {
            Ok(felts) => Some(felts),
            Err(e) => {
                tracing::debug!(
                    target: "tokenlens_common::contract",
                    contract = %format!("{contract:#x}"),
                    selector = %format!("{sel:#x}"),
                    error = %e,
                    "contract call failed"
                );
                None
            }
        }
    }
}

/// Calldata shapes for a token id argument: u256 `(low, high)` first,
/// then a single felt for contracts predating the u256 convention.
fn token_id_shapes(token_id: U256) -> [Vec<Felt>; 2] {
    [
        vec![Felt::from(token_id.low()), Felt::from(token_id.high())],
        vec![Felt::from(token_id.low())],
    ]
}

/// Decode a `starknet_call` result as a string.
///
/// Contracts return strings in three shapes:
/// 1. a single felt packing up to 31 bytes (short string)
/// 2. a Cairo ByteArray: `[chunk_count, ...chunks, pending_word, pending_len]`
/// 3. a legacy felt array: `[len, seg, seg, ...]` of short-string segments
fn decode_cairo_string(felts: &[Felt]) -> Option<String> {
    match felts {
        [] => None,
        [single] => decode_short_string(*single),
        _ => decode_byte_array(felts)
            .or_else(|| decode_felt_array(felts))
            .or_else(|| decode_short_string(felts[0])),
    }
}

fn decode_byte_array(felts: &[Felt]) -> Option<String> {
    let chunk_count: u64 = felts[0].try_into().ok()?;
    let chunk_count = chunk_count as usize;
    if chunk_count > MAX_STRING_FELTS || felts.len() < chunk_count + 3 {
        return None;
    }

    let mut out = String::new();
    for chunk in &felts[1..=chunk_count] {
        push_felt_bytes(&mut out, *chunk, 31);
    }

    let pending_word = felts[chunk_count + 1];
    let pending_len: u64 = felts[chunk_count + 2].try_into().ok()?;
    if (1..=31).contains(&pending_len) {
        push_felt_bytes(&mut out, pending_word, pending_len as usize);
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn decode_felt_array(felts: &[Felt]) -> Option<String> {
    let len: u64 = felts[0].try_into().ok()?;
    let len = len as usize;
    if len == 0 || len > MAX_STRING_FELTS || felts.len() < len + 1 {
        return None;
    }

    let mut out = String::new();
    for seg in &felts[1..=len] {
        if let Some(s) = decode_short_string(*seg) {
            out.push_str(&s);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Unpack a felt holding up to 31 big-endian ASCII bytes.
fn decode_short_string(felt: Felt) -> Option<String> {
    if felt == Felt::ZERO {
        return None;
    }

    let bytes = felt.to_bytes_be();
    let start = bytes.iter().position(|&b| b != 0)?;
    match std::str::from_utf8(&bytes[start..]) {
        Ok(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

/// Append exactly the last `len` bytes of the felt, if valid UTF-8.
fn push_felt_bytes(out: &mut String, felt: Felt, len: usize) {
    if len == 0 || len > 31 {
        return;
    }
    let bytes = felt.to_bytes_be();
    if let Ok(s) = std::str::from_utf8(&bytes[32 - len..]) {
        out.push_str(s);
    }
}

/// Parse a u256 return value.
///
/// Cairo 0 contracts return a single felt; Cairo 1 returns `[low, high]`.
fn parse_u256_felts(felts: &[Felt]) -> U256 {
    match felts {
        [] => U256::from(0u64),
        [single] => {
            let bytes = single.to_bytes_be();
            let high = u128::from_be_bytes(bytes[..16].try_into().unwrap());
            let low = u128::from_be_bytes(bytes[16..].try_into().unwrap());
            U256::from_words(low, high)
        }
        [low_felt, high_felt, ..] => {
            let low = u128::from_be_bytes(low_felt.to_bytes_be()[16..].try_into().unwrap());
            let high = u128::from_be_bytes(high_felt.to_bytes_be()[16..].try_into().unwrap());
            U256::from_words(low, high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_short_string() {
        // "ETH" = 0x455448
        assert_eq!(
            decode_short_string(Felt::from(0x0045_5448u64)),
            Some("ETH".to_string())
        );
        assert_eq!(decode_short_string(Felt::ZERO), None);
    }

    #[test]
    fn test_decode_single_felt_result() {
        let felts = vec![Felt::from(0x0045_5448u64)];
        assert_eq!(decode_cairo_string(&felts), Some("ETH".to_string()));
    }

    #[test]
    fn test_decode_byte_array_pending_only() {
        // [chunk_count=0, pending_word="ETH", pending_len=3]
        let felts = vec![
            Felt::from(0u64),
            Felt::from(0x0045_5448u64),
            Felt::from(3u64),
        ];
        assert_eq!(decode_cairo_string(&felts), Some("ETH".to_string()));
    }

    #[test]
    fn test_decode_byte_array_with_chunk() {
        // One full 31-byte chunk plus a 4-byte pending word.
        let chunk = Felt::from_bytes_be(&{
            let mut b = [0u8; 32];
            b[1..].copy_from_slice("ipfs://bafybeigdyrzt5sfp7udm7hu".as_bytes());
            b
        });
        let felts = vec![
            Felt::from(1u64),
            chunk,
            Felt::from(0x3736_776au64), // "76wj"
            Felt::from(4u64),
        ];
        assert_eq!(
            decode_cairo_string(&felts),
            Some("ipfs://bafybeigdyrzt5sfp7udm7hu76wj".to_string())
        );
    }

    #[test]
    fn test_decode_legacy_array() {
        // [len=2, "ab", "cd"]
        let felts = vec![
            Felt::from(2u64),
            Felt::from(0x6162u64),
            Felt::from(0x6364u64),
        ];
        assert_eq!(decode_cairo_string(&felts), Some("abcd".to_string()));
    }

    #[test]
    fn test_decode_empty_result() {
        assert_eq!(decode_cairo_string(&[]), None);
    }

    #[test]
    fn test_parse_u256_empty() {
        assert_eq!(parse_u256_felts(&[]), U256::from(0u64));
    }

    #[test]
    fn test_parse_u256_single_felt() {
        assert_eq!(parse_u256_felts(&[Felt::from(1000u64)]), U256::from(1000u64));
    }

    #[test]
    fn test_parse_u256_low_high_pair() {
        let felts = [Felt::from(7u64), Felt::from(1u64)];
        assert_eq!(parse_u256_felts(&felts), U256::from_words(7, 1));
    }

    #[test]
    fn test_token_id_shapes() {
        let shapes = token_id_shapes(U256::from(42u64));
        assert_eq!(shapes[0], vec![Felt::from(42u64), Felt::ZERO]);
        assert_eq!(shapes[1], vec![Felt::from(42u64)]);
    }
}
