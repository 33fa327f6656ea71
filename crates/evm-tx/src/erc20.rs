//! ERC-20 calldata builders

use num_bigint::BigUint;

use causeway_core::Address;

use crate::abi::{encode_call, AbiValue};
use crate::tx::TransactionRequest;

/// `2^256 - 1`, the unlimited-allowance value
pub fn max_uint256() -> BigUint {
    (BigUint::from(1u8) << 256u32) - BigUint::from(1u8)
}

/// Allowance granted in an approve call
#[derive(Debug, Clone)]
pub enum ApproveAmount {
    Exact(BigUint),
    Unlimited,
}

impl ApproveAmount {
    fn value(&self) -> BigUint {
        match self {
            Self::Exact(value) => value.clone(),
            Self::Unlimited => max_uint256(),
        }
    }
}

/// `approve(spender, value)` transaction against `token`
pub fn approve_request(token: Address, spender: Address, amount: &ApproveAmount) -> TransactionRequest {
    let data = encode_call(
        "approve(address,uint256)",
        &[AbiValue::Address(spender), AbiValue::Uint(amount.value())],
    )
    .expect("static arguments always encode");
    TransactionRequest::new(token, data)
}

/// Calldata for `allowance(owner, spender)`
pub fn allowance_calldata(owner: Address, spender: Address) -> Vec<u8> {
    encode_call(
        "allowance(address,address)",
        &[AbiValue::Address(owner), AbiValue::Address(spender)],
    )
    .expect("static arguments always encode")
}

/// Calldata for `balanceOf(owner)`
pub fn balance_of_calldata(owner: Address) -> Vec<u8> {
    encode_call("balanceOf(address)", &[AbiValue::Address(owner)])
        .expect("static arguments always encode")
}
