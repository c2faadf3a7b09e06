//! Call-data encoding for the whitelist contract.
//!
//! The contract interface is fixed, so only the handful of ABI shapes it needs
//! are supported: a selector with no arguments, a selector with one `address`
//! argument, and single-word `uint`/`bool` returns.

use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};
use wl_api_types::Address;

pub const NUM_ADDRESSES_WHITELISTED: &str = "numAddressesWhitelisted()";
pub const WHITELISTED_ADDRESSES: &str = "whitelistedAddresses(address)";
pub const ADD_ADDRESS_TO_WHITELIST: &str = "addAddressToWhitelist()";

const WORD: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("return data too short: expected {expected} bytes, got {actual}")]
    ShortData { expected: usize, actual: usize },
    #[error("uint return value does not fit in 64 bits")]
    Overflow,
    #[error("bool return word is neither 0 nor 1")]
    InvalidBool,
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut output = [0_u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// First four bytes of the Keccak-256 hash of a canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_num_addresses_whitelisted() -> Vec<u8> {
    selector(NUM_ADDRESSES_WHITELISTED).to_vec()
}

pub fn encode_whitelisted_addresses(address: &Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(WHITELISTED_ADDRESSES));
    data.extend_from_slice(&address_word(address));
    data
}

pub fn encode_add_address_to_whitelist() -> Vec<u8> {
    selector(ADD_ADDRESS_TO_WHITELIST).to_vec()
}

/// Left-pads an address to a full 32-byte word.
pub fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0_u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_bytes());
    word
}

pub fn decode_uint(data: &[u8]) -> Result<u64, AbiError> {
    let word = first_word(data)?;
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(low);
    Ok(u64::from_be_bytes(bytes))
}

pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    match decode_uint(first_word(data)?) {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        _ => Err(AbiError::InvalidBool),
    }
}

fn first_word(data: &[u8]) -> Result<&[u8], AbiError> {
    data.get(..WORD).ok_or(AbiError::ShortData {
        expected: WORD,
        actual: data.len(),
    })
}

/// Encodes a `uint` as a single word. Used by tests and mock nodes.
pub fn encode_uint(value: u64) -> Vec<u8> {
    let mut word = vec![0_u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn encode_bool(value: bool) -> Vec<u8> {
    encode_uint(u64::from(value))
}

/// EIP-55 mixed-case checksum form of an address.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = hex::encode(keccak256(lower.as_bytes()));

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (c, h) in lower.chars().zip(hash.chars()) {
        if c.is_ascii_alphabetic() && h.to_digit(16).unwrap_or(0) >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
