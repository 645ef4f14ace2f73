//! The five transaction shapes as a closed, tagged union.
//!
//! Each variant is a frozen record: `nonce`, `gas`, `to`, `value`, `data`,
//! `r`, `s` plus whatever that variant's EIP adds, including its own
//! signature fields. Nothing here mutates a transaction once built; a new
//! value is always the output of a decoder or a signer.

use crate::access::AccessList;
use crate::authorization::SignedAuthorization;
use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, ChainId, TxKind, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};
use bitflags::bitflags;

bitflags! {
    /// Per-variant capabilities, queried by gas accounting and
    /// signature validation instead of re-matching on [`TxType`] at
    /// every dispatch site.
    ///
    /// Grounded on `context/interface/src/transaction/tx_validation.rs`'s
    /// `ValidationChecks` bitflags in the collaborator codebase.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TxCapabilities: u8 {
        /// Carries an `access_list` (every variant but legacy).
        const ACCESS_LIST = 0b0001;
        /// Carries `blob_versioned_hashes` (EIP-4844 only).
        const BLOB_HASHES = 0b0010;
        /// Carries an `authorization_list` (EIP-7702 only).
        const AUTHORIZATION_LIST = 0b0100;
        /// `to` may be the empty-bytes creation sentinel, rather than
        /// always a 20-byte address (legacy/2930/1559 only).
        const CREATABLE = 0b1000;
    }
}

/// The EIP-2718 transaction type tag. [`TxType::Legacy`] has no tag byte on
/// the wire; it is distinguished by an RLP list prefix instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TxType {
    /// Untyped, pre-EIP-2718 transaction.
    Legacy = 0,
    /// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) access-list transaction.
    Eip2930 = 1,
    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) fee-market transaction.
    Eip1559 = 2,
    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transaction.
    Eip4844 = 3,
    /// [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) set-code transaction.
    Eip7702 = 4,
}

impl TxType {
    /// The tag byte a typed envelope carries for this type, or `None` for
    /// legacy, which has no tag byte at all.
    pub const fn tag(self) -> Option<u8> {
        match self {
            Self::Legacy => None,
            Self::Eip2930 => Some(0x01),
            Self::Eip1559 => Some(0x02),
            Self::Eip4844 => Some(0x03),
            Self::Eip7702 => Some(0x04),
        }
    }
}

/// Untyped transaction. Replay protection (EIP-155), if present, is folded
/// into `v` rather than carried as a separate `chain_id` field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxLegacy {
    /// Sender's transaction count at signing time.
    pub nonce: u64,
    /// Price paid per unit of gas, in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Value transferred, in wei.
    pub value: U256,
    /// Calldata or init code.
    pub input: Bytes,
    /// Legacy `v`: either `{27, 28}` (pre-EIP-155) or `35/36 + 2*chain_id`
    /// (EIP-155). See [`crate::signer`] for how this is interpreted.
    pub v: u64,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxLegacy {
    /// Length of the RLP-encoded field list, without the list header.
    fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.v.length()
            + self.r.length()
            + self.s.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            v: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl Encodable for TxLegacy {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.fields_len(),
        }
        .encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        length_of_length(payload_length) + payload_length
    }
}

impl Decodable for TxLegacy {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let remaining = buf.len();
        let tx = Self::decode_fields(buf)?;
        if remaining - buf.len() != header.payload_length {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        Ok(tx)
    }
}

/// Macro-free, copy-pasted field plumbing for the four typed variants. Each
/// repeats the same `fields_len`/`encode_fields`/`decode_fields`/`Encodable`/
/// `Decodable` shape as [`TxLegacy`]; the duplication mirrors how the
/// collaborator's own per-type files are laid out (one file, one type, no
/// shared trait object for the RLP plumbing).
macro_rules! impl_typed_rlp {
    ($ty:ty, $fields_len:ident, $encode_fields:ident, $decode_fields:ident) => {
        impl Encodable for $ty {
            fn encode(&self, out: &mut dyn BufMut) {
                Header {
                    list: true,
                    payload_length: self.$fields_len(),
                }
                .encode(out);
                self.$encode_fields(out);
            }

            fn length(&self) -> usize {
                let payload_length = self.$fields_len();
                length_of_length(payload_length) + payload_length
            }
        }

        impl Decodable for $ty {
            fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
                let header = Header::decode(buf)?;
                if !header.list {
                    return Err(alloy_rlp::Error::UnexpectedString);
                }
                let remaining = buf.len();
                let tx = Self::$decode_fields(buf)?;
                if remaining - buf.len() != header.payload_length {
                    return Err(alloy_rlp::Error::UnexpectedLength);
                }
                Ok(tx)
            }
        }
    };
}

/// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) access-list transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEip2930 {
    /// Chain this transaction is valid on.
    pub chain_id: ChainId,
    /// Sender's transaction count at signing time.
    pub nonce: u64,
    /// Price paid per unit of gas, in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Value transferred, in wei.
    pub value: U256,
    /// Calldata or init code.
    pub input: Bytes,
    /// Addresses and storage slots to warm before execution.
    pub access_list: AccessList,
    /// Signature y-parity.
    pub y_parity: u8,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxEip2930 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.y_parity.length()
            + self.r.length()
            + self.s.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl_typed_rlp!(TxEip2930, fields_len, encode_fields, decode_fields);

/// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) fee-market transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEip1559 {
    /// Chain this transaction is valid on.
    pub chain_id: ChainId,
    /// Sender's transaction count at signing time.
    pub nonce: u64,
    /// Tip paid to the block proposer, in wei per unit of gas.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee the sender is willing to pay, in wei per unit of gas.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Value transferred, in wei.
    pub value: U256,
    /// Calldata or init code.
    pub input: Bytes,
    /// Addresses and storage slots to warm before execution.
    pub access_list: AccessList,
    /// Signature y-parity.
    pub y_parity: u8,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxEip1559 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.y_parity.length()
            + self.r.length()
            + self.s.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl_typed_rlp!(TxEip1559, fields_len, encode_fields, decode_fields);

/// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transaction.
///
/// Contract creation is not representable: `to` is a plain [`Address`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEip4844 {
    /// Chain this transaction is valid on.
    pub chain_id: ChainId,
    /// Sender's transaction count at signing time.
    pub nonce: u64,
    /// Tip paid to the block proposer, in wei per unit of gas.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee the sender is willing to pay, in wei per unit of gas.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient. Blob transactions cannot create contracts.
    pub to: Address,
    /// Value transferred, in wei.
    pub value: U256,
    /// Calldata.
    pub input: Bytes,
    /// Addresses and storage slots to warm before execution.
    pub access_list: AccessList,
    /// Maximum fee, in wei per unit of blob gas, the sender will pay.
    pub max_fee_per_blob_gas: u128,
    /// KZG-commitment versioned hashes of the blobs this transaction carries.
    pub blob_versioned_hashes: Vec<crate::VersionedHash>,
    /// Signature y-parity.
    pub y_parity: u8,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxEip4844 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.max_fee_per_blob_gas.length()
            + self.blob_versioned_hashes.length()
            + self.y_parity.length()
            + self.r.length()
            + self.s.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.max_fee_per_blob_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
        self.y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            max_fee_per_blob_gas: Decodable::decode(buf)?,
            blob_versioned_hashes: Decodable::decode(buf)?,
            y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl_typed_rlp!(TxEip4844, fields_len, encode_fields, decode_fields);

/// [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) set-code transaction.
///
/// Contract creation is not representable: `to` is a plain [`Address`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEip7702 {
    /// Chain this transaction is valid on.
    pub chain_id: ChainId,
    /// Sender's transaction count at signing time. Unlike the other
    /// variants this is exposed as `u64` directly, not a wider integer that
    /// must later be checked against `2^64 - 1` (EIP-2681).
    pub nonce: u64,
    /// Tip paid to the block proposer, in wei per unit of gas.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee the sender is willing to pay, in wei per unit of gas.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient. Set-code transactions cannot create contracts.
    pub to: Address,
    /// Value transferred, in wei.
    pub value: U256,
    /// Calldata.
    pub input: Bytes,
    /// Addresses and storage slots to warm before execution.
    pub access_list: AccessList,
    /// Code-delegation authorizations to apply before execution.
    pub authorization_list: Vec<SignedAuthorization>,
    /// Signature y-parity.
    pub y_parity: u8,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxEip7702 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.authorization_list.length()
            + self.y_parity.length()
            + self.r.length()
            + self.s.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.authorization_list.encode(out);
        self.y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            authorization_list: Decodable::decode(buf)?,
            y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl_typed_rlp!(TxEip7702, fields_len, encode_fields, decode_fields);

/// The closed set of transaction shapes.
///
/// Dispatch is always by this tag, never by structurally inspecting which
/// fields happen to be present.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TxEnvelope {
    /// Untyped legacy transaction.
    Legacy(TxLegacy),
    /// EIP-2930 access-list transaction.
    Eip2930(TxEip2930),
    /// EIP-1559 fee-market transaction.
    Eip1559(TxEip1559),
    /// EIP-4844 blob transaction.
    Eip4844(TxEip4844),
    /// EIP-7702 set-code transaction.
    Eip7702(TxEip7702),
}

impl TxEnvelope {
    /// This transaction's type tag.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }

    /// This variant's [`TxCapabilities`].
    pub fn capabilities(&self) -> TxCapabilities {
        match self {
            Self::Legacy(_) => TxCapabilities::CREATABLE,
            Self::Eip2930(_) => TxCapabilities::ACCESS_LIST.union(TxCapabilities::CREATABLE),
            Self::Eip1559(_) => TxCapabilities::ACCESS_LIST.union(TxCapabilities::CREATABLE),
            Self::Eip4844(_) => TxCapabilities::ACCESS_LIST.union(TxCapabilities::BLOB_HASHES),
            Self::Eip7702(_) => {
                TxCapabilities::ACCESS_LIST.union(TxCapabilities::AUTHORIZATION_LIST)
            }
        }
    }

    /// Does this variant carry an `access_list`? True for every
    /// non-legacy variant.
    pub fn has_access_list(&self) -> bool {
        self.capabilities().contains(TxCapabilities::ACCESS_LIST)
    }

    /// The access list, if this variant carries one.
    pub const fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(_) => None,
            Self::Eip2930(tx) => Some(&tx.access_list),
            Self::Eip1559(tx) => Some(&tx.access_list),
            Self::Eip4844(tx) => Some(&tx.access_list),
            Self::Eip7702(tx) => Some(&tx.access_list),
        }
    }

    /// Recipient: either a call target or the creation sentinel. Blob and
    /// set-code transactions never create, so they report `TxKind::Call`.
    pub const fn to(&self) -> TxKind {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::Eip2930(tx) => tx.to,
            Self::Eip1559(tx) => tx.to,
            Self::Eip4844(tx) => TxKind::Call(tx.to),
            Self::Eip7702(tx) => TxKind::Call(tx.to),
        }
    }

    /// Calldata or init code.
    pub fn input(&self) -> &Bytes {
        match self {
            Self::Legacy(tx) => &tx.input,
            Self::Eip2930(tx) => &tx.input,
            Self::Eip1559(tx) => &tx.input,
            Self::Eip4844(tx) => &tx.input,
            Self::Eip7702(tx) => &tx.input,
        }
    }

    /// Gas limit.
    pub const fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::Eip2930(tx) => tx.gas_limit,
            Self::Eip1559(tx) => tx.gas_limit,
            Self::Eip4844(tx) => tx.gas_limit,
            Self::Eip7702(tx) => tx.gas_limit,
        }
    }

    /// Sender's transaction count, widened to `u128` so legacy/typed values
    /// that exceed `u64` (rejected by intrinsic-gas validation) can still be
    /// represented and reported.
    pub const fn nonce(&self) -> u128 {
        match self {
            Self::Legacy(tx) => tx.nonce as u128,
            Self::Eip2930(tx) => tx.nonce as u128,
            Self::Eip1559(tx) => tx.nonce as u128,
            Self::Eip4844(tx) => tx.nonce as u128,
            Self::Eip7702(tx) => tx.nonce as u128,
        }
    }

    /// Number of EIP-7702 authorization tuples this transaction carries;
    /// `0` for every variant but [`TxEnvelope::Eip7702`].
    pub fn authorization_list_len(&self) -> usize {
        match self {
            Self::Eip7702(tx) => tx.authorization_list.len(),
            _ => 0,
        }
    }
}
