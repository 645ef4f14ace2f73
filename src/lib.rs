//! Transaction core for an Ethereum execution-layer client at the Prague hardfork.
//!
//! This crate owns the consensus-critical surface that sits between raw wire
//! bytes and the EVM: the five transaction shapes, the typed-envelope codec
//! that wraps them (EIP-2718), the intrinsic-gas accounting a block validator
//! charges before execution (including the EIP-7623 calldata floor), and the
//! signature scheme that recovers a transaction's sender.
//!
//! Everything in [`gas`] and [`signer`] is a pure function of its arguments:
//! no logging, no clocks, no shared state. Telemetry belongs to the caller.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(unreachable_pub)]

extern crate alloc;

pub mod access;
pub mod authorization;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod gas;
#[cfg(feature = "k256")]
pub mod signer;
pub mod transaction;

pub use access::{AccessList, AccessListItem};
pub use authorization::{Authorization, SignedAuthorization};
pub use envelope::{decode, encode, transaction_hash};
pub use error::{EnvelopeError, InvalidSignatureError, InvalidTransaction};
pub use gas::InitialAndFloorGas;
pub use transaction::{
    TxCapabilities, TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxEnvelope, TxLegacy, TxType,
};

pub use alloy_primitives::{Address, Bytes, ChainId, TxKind, B256, U256};

/// A 32-byte hash. Every hash in this crate (transaction hashes, signing
/// hashes, blob versioned hashes) shares this representation.
pub type Hash32 = B256;

/// A versioned hash as introduced by EIP-4844: a KZG commitment hash with its
/// leading byte replaced by a version marker.
pub type VersionedHash = B256;
