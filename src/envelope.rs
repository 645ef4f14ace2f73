//! The EIP-2718 typed-envelope codec.
//!
//! A legacy transaction is RLP-encoded as a plain list, exactly as it was
//! before EIP-2718. Every other variant is wrapped as `tag_byte ‖
//! rlp(fields)` — raw byte concatenation, *not* a further RLP object. The
//! tag byte therefore never goes through [`Encodable`]; it is written with
//! [`BufMut::put_u8`] directly.

use crate::error::{EnvelopeError, TransactionTypeError};
use crate::transaction::{TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxEnvelope, TxLegacy};
use crate::Hash32;
use alloc::vec::Vec;
use alloy_primitives::Keccak256;
use alloy_rlp::{BufMut, Decodable, Encodable};

/// Encodes a transaction into its canonical on-wire bytes.
///
/// For [`TxEnvelope::Legacy`] this is the bare RLP list; the caller's outer
/// RLP layer treats it as a nested list when embedding it in a block body.
/// For every other variant this is `tag_byte ‖ rlp(fields)`, which the outer
/// RLP layer must treat as an opaque byte string.
pub fn encode(tx: &TxEnvelope) -> Vec<u8> {
    match tx {
        TxEnvelope::Legacy(inner) => {
            let mut out = Vec::with_capacity(inner.length());
            inner.encode(&mut out);
            out
        }
        TxEnvelope::Eip2930(inner) => encode_typed(0x01, inner),
        TxEnvelope::Eip1559(inner) => encode_typed(0x02, inner),
        TxEnvelope::Eip4844(inner) => encode_typed(0x03, inner),
        TxEnvelope::Eip7702(inner) => encode_typed(0x04, inner),
    }
}

fn encode_typed<T: Encodable>(tag: u8, inner: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + inner.length());
    out.put_u8(tag);
    inner.encode(&mut out);
    out
}

/// Decodes a transaction from its canonical on-wire bytes.
///
/// A leading byte in `0xc0..=0xff` (an RLP list) is decoded as a legacy
/// transaction. A leading byte in `{0x01, 0x02, 0x03, 0x04}` selects the
/// matching typed variant, decoded from the remainder. Any other leading
/// byte is [`EnvelopeError::UnknownType`]; an empty input is
/// [`alloy_rlp::Error::InputTooShort`].
pub fn decode(input: &[u8]) -> Result<TxEnvelope, EnvelopeError> {
    let &first = input.first().ok_or(alloy_rlp::Error::InputTooShort)?;

    if first >= 0xc0 {
        let mut buf = input;
        return Ok(TxEnvelope::Legacy(TxLegacy::decode(&mut buf)?));
    }

    let mut body = &input[1..];
    match first {
        0x01 => Ok(TxEnvelope::Eip2930(TxEip2930::decode(&mut body)?)),
        0x02 => Ok(TxEnvelope::Eip1559(TxEip1559::decode(&mut body)?)),
        0x03 => Ok(TxEnvelope::Eip4844(TxEip4844::decode(&mut body)?)),
        0x04 => Ok(TxEnvelope::Eip7702(TxEip7702::decode(&mut body)?)),
        other => Err(TransactionTypeError(other).into()),
    }
}

/// `keccak256` of the canonical encoding. Takes the output of
/// [`encode`] rather than a [`TxEnvelope`] directly, so callers that already
/// have the wire bytes (e.g. from the mempool) don't pay to re-encode.
pub fn transaction_hash(encoded: &[u8]) -> Hash32 {
    let mut hasher = Keccak256::new();
    hasher.update(encoded);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessList, AccessListItem};
    use crate::transaction::TxType;
    use alloy_primitives::{address, b256, TxKind, U256};

    fn legacy_fixture() -> TxEnvelope {
        TxEnvelope::Legacy(TxLegacy {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("3535353535353535353535353535353535353535")),
            value: U256::from(1_000_000_000_000_000_000u128),
            input: Default::default(),
            v: 37,
            r: U256::from(1),
            s: U256::from(1),
        })
    }

    fn eip1559_fixture() -> TxEnvelope {
        TxEnvelope::Eip1559(TxEip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 2_000_000_000,
            gas_limit: 100_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000001")),
            value: U256::ZERO,
            input: Default::default(),
            access_list: AccessList(alloc::vec![AccessListItem {
                address: address!("0000000000000000000000000000000000000002"),
                storage_keys: alloc::vec![b256!(
                    "0000000000000000000000000000000000000000000000000000000000000001"
                )],
            }]),
            y_parity: 0,
            r: U256::from(1),
            s: U256::from(1),
        })
    }

    #[test]
    fn legacy_round_trips_as_a_bare_rlp_list() {
        let tx = legacy_fixture();
        let encoded = encode(&tx);
        assert!(encoded[0] >= 0xc0, "legacy encoding must be a list");
        assert_eq!(decode(&encoded).unwrap(), tx);
    }

    #[test]
    fn typed_envelope_round_trips_with_tag_outside_the_rlp() {
        let tx = eip1559_fixture();
        let encoded = encode(&tx);
        assert_eq!(encoded[0], 0x02);
        // The tag byte is raw, not itself RLP-encoded as a one-byte string
        // (which would also happen to be 0x02, so check the second byte is
        // an RLP list header instead of another one-byte string marker).
        assert!(encoded[1] >= 0xc0);
        assert_eq!(tx.tx_type(), TxType::Eip1559);
        assert_eq!(decode(&encoded).unwrap(), tx);
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let err = decode(&[0x05, 0xc0]).unwrap_err();
        assert!(matches!(err, EnvelopeError::UnknownType(5)));
    }

    #[test]
    fn empty_input_fails_rather_than_panicking() {
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn tag_injectivity() {
        let a = eip1559_fixture();
        let mut b = eip1559_fixture();
        if let TxEnvelope::Eip1559(tx) = &mut b {
            tx.nonce = 1;
        }
        assert_ne!(encode(&a), encode(&b));
    }
}
