//! Constants referenced by the intrinsic gas calculator and signer.
//!
//! A few of these belong, strictly speaking, to collaborator specs that this
//! crate treats as external (the EVM interpreter's code-size limit and
//! initcode metering, and EOA delegation's empty-account cost). They are
//! reproduced here verbatim because the intrinsic gas calculator must charge
//! for them without depending on the collaborator crates themselves.

use alloy_primitives::U256;

/// Base intrinsic cost charged to every transaction.
pub const TX_BASE_COST: u64 = 21_000;

/// Additional cost for a contract-creation transaction, on top of
/// [`TX_BASE_COST`] and [`init_code_cost`].
pub const TX_CREATE_COST: u64 = 32_000;

/// Cost per unique address touched through an access list entry.
pub const TX_ACCESS_LIST_ADDRESS_COST: u64 = 2_400;

/// Cost per storage key touched through an access list entry.
pub const TX_ACCESS_LIST_STORAGE_KEY_COST: u64 = 1_900;

/// Cost, in "tokens", per byte of calldata: nonzero bytes weigh this many
/// tokens, zero bytes weigh one token.
pub const STANDARD_CALLDATA_TOKEN_COST: u64 = 4;

/// EIP-7623 floor cost per calldata token.
pub const FLOOR_CALLDATA_COST: u64 = 10;

/// EIP-7702: cost charged per authorization tuple in a SetCode transaction,
/// as if every delegated account were being created from empty. Owned by the
/// EOA-delegation collaborator; reproduced here for cost accounting only.
pub const PER_EMPTY_ACCOUNT_COST: u64 = 25_000;

/// EIP-170: maximum size of deployed contract code. Owned by the EVM
/// interpreter collaborator; reproduced here because the creation-cost
/// boundary check in [`crate::gas`] needs it.
pub const MAX_CODE_SIZE: usize = 0x6000;

/// EIP-3860: cost per 32-byte word of initcode, charged on top of
/// [`TX_CREATE_COST`]. Owned by the EVM interpreter collaborator.
const INITCODE_WORD_COST: u64 = 2;

/// EIP-3860's `init_code_cost(len)`: two gas per 32-byte word, rounded up.
///
/// The EVM interpreter collaborator is the conceptual owner of this
/// function; it is reproduced here verbatim since intrinsic gas accounting
/// needs it and this crate does not depend on the interpreter crate.
#[inline]
pub const fn init_code_cost(len: usize) -> u64 {
    INITCODE_WORD_COST * (len as u64).div_ceil(32)
}

/// The secp256k1 curve order `N`.
pub const SECP256K1N: U256 = U256::from_limbs([
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
]);

/// `N / 2`, the EIP-2 low-s malleability boundary: valid `s` values must not
/// exceed this.
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
]);
