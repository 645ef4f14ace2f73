//! The three error kinds this crate can raise.
//!
//! None of them are recovered internally: they are surfaced to the caller,
//! which rejects the transaction (mempool) or invalidates the enclosing
//! block (consensus). Consensus behavior must depend only on *which* variant
//! is raised, never on the `Display` text, so every variant that matters to
//! a caller carries structured data rather than a formatted string.

use core::fmt;

/// The leading byte of a typed envelope did not match any known transaction
/// type.
///
/// Reserved tag range is `0x01..=0x04`; anything else in `0x00..=0x7f`
/// reaching the typed-envelope decoder is an error. Bytes in `0xc0..=0xff`
/// never reach this point, the caller's RLP layer routes them as legacy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionTypeError(pub u8);

impl fmt::Display for TransactionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction type byte: 0x{:02x}", self.0)
    }
}

impl core::error::Error for TransactionTypeError {}

/// Failure of the envelope codec: either an unknown type byte, or a
/// malformed RLP body for an otherwise recognized type.
#[derive(Debug)]
pub enum EnvelopeError {
    /// See [`TransactionTypeError`].
    UnknownType(u8),
    /// The RLP body did not decode into the expected field shape: wrong
    /// field count, trailing bytes, or a malformed element.
    Rlp(alloy_rlp::Error),
}

impl From<TransactionTypeError> for EnvelopeError {
    fn from(value: TransactionTypeError) -> Self {
        Self::UnknownType(value.0)
    }
}

impl From<alloy_rlp::Error> for EnvelopeError {
    fn from(value: alloy_rlp::Error) -> Self {
        Self::Rlp(value)
    }
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(byte) => write!(f, "unknown transaction type byte: 0x{byte:02x}"),
            Self::Rlp(err) => write!(f, "malformed transaction rlp: {err}"),
        }
    }
}

impl core::error::Error for EnvelopeError {}

/// A structural or accounting failure found by [`crate::gas::validate_transaction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidTransaction {
    /// `max(intrinsic_gas, calldata_floor_gas_cost)` exceeds `tx.gas`.
    InsufficientGas {
        /// The larger of intrinsic gas and the EIP-7623 floor.
        required: u64,
        /// Gas the transaction actually carries.
        gas_limit: u64,
    },
    /// `tx.nonce >= 2^64 - 1` (EIP-2681).
    NonceTooHigh,
    /// Contract-creation calldata exceeds `2 * MAX_CODE_SIZE`.
    CreateInitCodeSizeLimit,
    /// An intrinsic-gas accumulation exceeded `u64`, which should be
    /// impossible for any transaction that fits on the wire; surfaced
    /// rather than silently wrapped or saturated.
    GasOverflow,
}

impl fmt::Display for InvalidTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientGas {
                required,
                gas_limit,
            } => write!(
                f,
                "insufficient gas: requires {required}, transaction carries {gas_limit}"
            ),
            Self::NonceTooHigh => write!(f, "nonce too high"),
            Self::CreateInitCodeSizeLimit => write!(f, "code size too large"),
            Self::GasOverflow => write!(f, "intrinsic gas overflow"),
        }
    }
}

impl core::error::Error for InvalidTransaction {}

/// Signature components out of range, malleable, or unrecoverable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidSignatureError {
    /// `r` is zero or `>= SECP256K1N`.
    BadR,
    /// `s` is zero or `> SECP256K1N / 2` (EIP-2 low-s).
    BadS,
    /// A typed transaction's `y_parity` was not `0` or `1`.
    BadYParity,
    /// A legacy transaction's `v` matched neither the pre-EIP-155 values
    /// `{27, 28}` nor the EIP-155 pair for the given chain id.
    BadV,
    /// `r`/`s`/recovery id were in range but did not recover to a valid
    /// public key.
    RecoveryFailed,
}

impl fmt::Display for InvalidSignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadR => write!(f, "bad r"),
            Self::BadS => write!(f, "bad s"),
            Self::BadYParity => write!(f, "bad y_parity"),
            Self::BadV => write!(f, "bad v"),
            Self::RecoveryFailed => write!(f, "signature did not recover to a valid public key"),
        }
    }
}

impl core::error::Error for InvalidSignatureError {}
