//! Solidity ABI encoding for contract calls
//!
//! Covers the subset of the ABI the SDK actually emits: unsigned integers,
//! addresses, booleans, fixed and dynamic bytes, dynamic arrays and tuples,
//! with standard head/tail layout for dynamic data. Return data is decoded
//! word-wise; every read the SDK performs returns static words.

use num_bigint::BigUint;
use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};

use causeway_core::Address;

pub const WORD: usize = 32;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Integer does not fit in 32 bytes")]
    UintOverflow,

    #[error("Fixed bytes longer than 32 bytes: {0}")]
    FixedBytesTooLong(usize),

    #[error("Return data length {0} is not a multiple of 32")]
    MisalignedReturnData(usize),
}

/// A single encodable argument
#[derive(Debug, Clone)]
pub enum AbiValue {
    /// Any unsigned integer type; encoded as a uint256 word
    Uint(BigUint),
    Address(Address),
    Bool(bool),
    /// `bytesN`, right-padded into one word
    FixedBytes(Vec<u8>),
    /// Dynamic `bytes`
    Bytes(Vec<u8>),
    /// Dynamic array of uniform element type
    Array(Vec<AbiValue>),
    /// Struct argument
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    pub fn uint(value: impl Into<BigUint>) -> Self {
        Self::Uint(value.into())
    }

    fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes(_) | Self::Array(_) => true,
            Self::Tuple(values) => values.iter().any(AbiValue::is_dynamic),
            _ => false,
        }
    }

    /// Size this value occupies in the head section
    fn head_size(&self) -> usize {
        match self {
            Self::Tuple(values) if !self.is_dynamic() => {
                values.iter().map(AbiValue::head_size).sum()
            }
            _ => WORD,
        }
    }
}

/// 4-byte function selector: `keccak256(signature)[..4]`
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hash = [0u8; 32];
    let mut keccak = Keccak::v256();
    keccak.update(signature.as_bytes());
    keccak.finalize(&mut hash);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a full call: selector followed by the argument block
pub fn encode_call(signature: &str, values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let mut out = selector(signature).to_vec();
    out.extend(encode_arguments(values)?);
    Ok(out)
}

/// Encode an argument block with head/tail layout. Offsets for dynamic
/// values are relative to the start of the block.
pub fn encode_arguments(values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let head_size: usize = values.iter().map(AbiValue::head_size).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for value in values {
        if value.is_dynamic() {
            head.extend(uint_word(&BigUint::from(head_size + tail.len())));
            tail.extend(encode_value(value)?);
        } else {
            head.extend(encode_value(value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn encode_value(value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    match value {
        AbiValue::Uint(v) => {
            let bytes = v.to_bytes_be();
            if bytes.len() > WORD {
                return Err(AbiError::UintOverflow);
            }
            Ok(uint_word(v).to_vec())
        }
        AbiValue::Address(addr) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr.as_bytes());
            Ok(word.to_vec())
        }
        AbiValue::Bool(b) => {
            let mut word = [0u8; WORD];
            word[31] = u8::from(*b);
            Ok(word.to_vec())
        }
        AbiValue::FixedBytes(bytes) => {
            if bytes.len() > WORD {
                return Err(AbiError::FixedBytesTooLong(bytes.len()));
            }
            let mut word = [0u8; WORD];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(word.to_vec())
        }
        AbiValue::Bytes(bytes) => {
            let mut out = uint_word(&BigUint::from(bytes.len())).to_vec();
            out.extend(bytes);
            let padding = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(padding));
            Ok(out)
        }
        AbiValue::Array(items) => {
            let mut out = uint_word(&BigUint::from(items.len())).to_vec();
            out.extend(encode_arguments(items)?);
            Ok(out)
        }
        AbiValue::Tuple(items) => encode_arguments(items),
    }
}

fn uint_word(value: &BigUint) -> [u8; WORD] {
    let bytes = value.to_bytes_be();
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    word
}

// ---------------------------------------------------------------------------
// Return data decoding
// ---------------------------------------------------------------------------

/// Split return data into 32-byte words
pub fn decode_words(data: &[u8]) -> Result<Vec<[u8; WORD]>, AbiError> {
    if data.len() % WORD != 0 {
        return Err(AbiError::MisalignedReturnData(data.len()));
    }
    Ok(data
        .chunks_exact(WORD)
        .map(|chunk| {
            let mut word = [0u8; WORD];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

pub fn word_to_uint(word: &[u8; WORD]) -> BigUint {
    BigUint::from_bytes_be(word)
}

pub fn word_to_address(word: &[u8; WORD]) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Address(bytes)
}

pub fn word_to_bool(word: &[u8; WORD]) -> bool {
    word.iter().any(|b| *b != 0)
}
