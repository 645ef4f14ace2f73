//! Signing-hash construction and sender recovery.
//!
//! Every preimage here is built the same way [`crate::authorization`] builds
//! its EIP-7702 magic-byte preimage: a manual `Header` + field encode into a
//! `Vec<u8>`, never through a derived [`alloy_rlp::Encodable`] impl, because
//! the typed-transaction preimages prepend a raw tag byte that must never be
//! RLP-encoded itself.

use crate::constants::SECP256K1N_HALF;
use crate::error::InvalidSignatureError;
use crate::transaction::{TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxEnvelope, TxLegacy};
use crate::{Address, Hash32, U256};
use alloc::vec::Vec;
use alloy_primitives::Keccak256;
use alloy_rlp::{BufMut, Encodable, Header};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// Signs a prehashed message with `key`, returning the recoverable signature
/// and its recovery id. Used by tests and by callers assembling a signed
/// transaction outside this crate's pure core.
pub fn sign_prehash(key: &k256::ecdsa::SigningKey, hash: &[u8]) -> (Signature, RecoveryId) {
    key.sign_prehash_recoverable(hash)
        .expect("signing a 32-byte prehash cannot fail")
}

/// `rlp([nonce, gas_price, gas, to, value, data])`, optionally followed by
/// `[chain_id, 0, 0]` for EIP-155 replay protection.
pub fn signing_hash_legacy(tx: &TxLegacy, chain_id: Option<u64>) -> Hash32 {
    let eip155_len = chain_id.map_or(0, |id| id.length() + 1 + 1);
    let payload_length = tx.nonce.length()
        + tx.gas_price.length()
        + tx.gas_limit.length()
        + tx.to.length()
        + tx.value.length()
        + tx.input.0.length()
        + eip155_len;

    let mut out = Vec::with_capacity(payload_length + 8);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    tx.nonce.encode(&mut out);
    tx.gas_price.encode(&mut out);
    tx.gas_limit.encode(&mut out);
    tx.to.encode(&mut out);
    tx.value.encode(&mut out);
    tx.input.0.encode(&mut out);
    if let Some(id) = chain_id {
        id.encode(&mut out);
        0u8.encode(&mut out);
        0u8.encode(&mut out);
    }

    let mut hasher = Keccak256::new();
    hasher.update(&out);
    hasher.finalize()
}

/// `0x01 ‖ rlp([chain_id, nonce, gas_price, gas, to, value, data, access_list])`.
pub fn signing_hash_eip2930(tx: &TxEip2930) -> Hash32 {
    let payload_length = tx.chain_id.length()
        + tx.nonce.length()
        + tx.gas_price.length()
        + tx.gas_limit.length()
        + tx.to.length()
        + tx.value.length()
        + tx.input.0.length()
        + tx.access_list.length();

    let mut out = Vec::with_capacity(1 + payload_length + 8);
    out.put_u8(0x01);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    tx.chain_id.encode(&mut out);
    tx.nonce.encode(&mut out);
    tx.gas_price.encode(&mut out);
    tx.gas_limit.encode(&mut out);
    tx.to.encode(&mut out);
    tx.value.encode(&mut out);
    tx.input.0.encode(&mut out);
    tx.access_list.encode(&mut out);

    let mut hasher = Keccak256::new();
    hasher.update(&out);
    hasher.finalize()
}

/// `0x02 ‖ rlp([chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas, to, value, data, access_list])`.
pub fn signing_hash_eip1559(tx: &TxEip1559) -> Hash32 {
    let payload_length = tx.chain_id.length()
        + tx.nonce.length()
        + tx.max_priority_fee_per_gas.length()
        + tx.max_fee_per_gas.length()
        + tx.gas_limit.length()
        + tx.to.length()
        + tx.value.length()
        + tx.input.0.length()
        + tx.access_list.length();

    let mut out = Vec::with_capacity(1 + payload_length + 8);
    out.put_u8(0x02);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    tx.chain_id.encode(&mut out);
    tx.nonce.encode(&mut out);
    tx.max_priority_fee_per_gas.encode(&mut out);
    tx.max_fee_per_gas.encode(&mut out);
    tx.gas_limit.encode(&mut out);
    tx.to.encode(&mut out);
    tx.value.encode(&mut out);
    tx.input.0.encode(&mut out);
    tx.access_list.encode(&mut out);

    let mut hasher = Keccak256::new();
    hasher.update(&out);
    hasher.finalize()
}

/// `0x03 ‖ rlp([chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas, to, value, data, access_list, max_fee_per_blob_gas, blob_versioned_hashes])`.
pub fn signing_hash_eip4844(tx: &TxEip4844) -> Hash32 {
    let payload_length = tx.chain_id.length()
        + tx.nonce.length()
        + tx.max_priority_fee_per_gas.length()
        + tx.max_fee_per_gas.length()
        + tx.gas_limit.length()
        + tx.to.length()
        + tx.value.length()
        + tx.input.0.length()
        + tx.access_list.length()
        + tx.max_fee_per_blob_gas.length()
        + tx.blob_versioned_hashes.length();

    let mut out = Vec::with_capacity(1 + payload_length + 8);
    out.put_u8(0x03);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    tx.chain_id.encode(&mut out);
    tx.nonce.encode(&mut out);
    tx.max_priority_fee_per_gas.encode(&mut out);
    tx.max_fee_per_gas.encode(&mut out);
    tx.gas_limit.encode(&mut out);
    tx.to.encode(&mut out);
    tx.value.encode(&mut out);
    tx.input.0.encode(&mut out);
    tx.access_list.encode(&mut out);
    tx.max_fee_per_blob_gas.encode(&mut out);
    tx.blob_versioned_hashes.encode(&mut out);

    let mut hasher = Keccak256::new();
    hasher.update(&out);
    hasher.finalize()
}

/// `0x04 ‖ rlp([chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas, to, value, data, access_list, authorizations])`.
pub fn signing_hash_eip7702(tx: &TxEip7702) -> Hash32 {
    let payload_length = tx.chain_id.length()
        + tx.nonce.length()
        + tx.max_priority_fee_per_gas.length()
        + tx.max_fee_per_gas.length()
        + tx.gas_limit.length()
        + tx.to.length()
        + tx.value.length()
        + tx.input.0.length()
        + tx.access_list.length()
        + tx.authorization_list.length();

    let mut out = Vec::with_capacity(1 + payload_length + 8);
    out.put_u8(0x04);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    tx.chain_id.encode(&mut out);
    tx.nonce.encode(&mut out);
    tx.max_priority_fee_per_gas.encode(&mut out);
    tx.max_fee_per_gas.encode(&mut out);
    tx.gas_limit.encode(&mut out);
    tx.to.encode(&mut out);
    tx.value.encode(&mut out);
    tx.input.0.encode(&mut out);
    tx.access_list.encode(&mut out);
    tx.authorization_list.encode(&mut out);

    let mut hasher = Keccak256::new();
    hasher.update(&out);
    hasher.finalize()
}

/// Checks `0 < r < SECP256K1N`.
fn check_r(r: U256) -> Result<(), InvalidSignatureError> {
    if r.is_zero() || r >= crate::constants::SECP256K1N {
        return Err(InvalidSignatureError::BadR);
    }
    Ok(())
}

/// Checks `0 < s <= SECP256K1N / 2`, the EIP-2 low-s malleability bound.
fn check_s(s: U256) -> Result<(), InvalidSignatureError> {
    if s.is_zero() || s > SECP256K1N_HALF {
        return Err(InvalidSignatureError::BadS);
    }
    Ok(())
}

fn recover_address(
    r: U256,
    s: U256,
    recovery_id: u8,
    hash: Hash32,
) -> Result<Address, InvalidSignatureError> {
    check_r(r)?;
    check_s(s)?;

    let signature = Signature::from_scalars(
        *k256::FieldBytes::from_slice(&r.to_be_bytes::<32>()),
        *k256::FieldBytes::from_slice(&s.to_be_bytes::<32>()),
    )
    .map_err(|_| InvalidSignatureError::RecoveryFailed)?;
    let recovery_id =
        RecoveryId::from_byte(recovery_id).ok_or(InvalidSignatureError::RecoveryFailed)?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)
        .map_err(|_| InvalidSignatureError::RecoveryFailed)?;
    let encoded = verifying_key.to_encoded_point(false);

    let mut hasher = Keccak256::new();
    hasher.update(&encoded.as_bytes()[1..]);
    Ok(Address::from_slice(&hasher.finalize()[12..]))
}

/// Determines the legacy recovery id and EIP-155 chain id (if any) implied
/// by `v`, against the caller-supplied `chain_id`.
///
/// `chain_id` is the context the caller expects this transaction to be
/// valid on; `v` must match it exactly once EIP-155 is in play. A `v` of
/// `27`/`28` is accepted unconditionally (pre-EIP-155, no replay
/// protection), independent of `chain_id`.
fn legacy_recovery(v: u64, chain_id: Option<u64>) -> Result<(u8, Option<u64>), InvalidSignatureError> {
    if v == 27 || v == 28 {
        return Ok(((v - 27) as u8, None));
    }

    let chain_id = chain_id.ok_or(InvalidSignatureError::BadV)?;
    let chain_id_x2 = chain_id
        .checked_mul(2)
        .ok_or(InvalidSignatureError::BadV)?;
    let lo = chain_id_x2 + 35;
    let hi = chain_id_x2 + 36;
    if v == lo {
        Ok((0, Some(chain_id)))
    } else if v == hi {
        Ok((1, Some(chain_id)))
    } else {
        Err(InvalidSignatureError::BadV)
    }
}

/// Recovers the sender of `tx`.
///
/// `chain_id` is the chain the caller expects this transaction to be valid
/// on. It governs EIP-155 `v` validation for [`TxEnvelope::Legacy`]; typed
/// variants instead carry their own `chain_id` field and use it directly for
/// their signing hash, so the parameter is unused for those variants.
pub fn recover_sender(
    chain_id: Option<u64>,
    tx: &TxEnvelope,
) -> Result<Address, InvalidSignatureError> {
    match tx {
        TxEnvelope::Legacy(inner) => {
            let (recovery_id, signing_chain_id) = legacy_recovery(inner.v, chain_id)?;
            let hash = signing_hash_legacy(inner, signing_chain_id);
            recover_address(inner.r, inner.s, recovery_id, hash)
        }
        TxEnvelope::Eip2930(inner) => {
            if inner.y_parity > 1 {
                return Err(InvalidSignatureError::BadYParity);
            }
            let hash = signing_hash_eip2930(inner);
            recover_address(inner.r, inner.s, inner.y_parity, hash)
        }
        TxEnvelope::Eip1559(inner) => {
            if inner.y_parity > 1 {
                return Err(InvalidSignatureError::BadYParity);
            }
            let hash = signing_hash_eip1559(inner);
            recover_address(inner.r, inner.s, inner.y_parity, hash)
        }
        TxEnvelope::Eip4844(inner) => {
            if inner.y_parity > 1 {
                return Err(InvalidSignatureError::BadYParity);
            }
            let hash = signing_hash_eip4844(inner);
            recover_address(inner.r, inner.s, inner.y_parity, hash)
        }
        TxEnvelope::Eip7702(inner) => {
            if inner.y_parity > 1 {
                return Err(InvalidSignatureError::BadYParity);
            }
            let hash = signing_hash_eip7702(inner);
            recover_address(inner.r, inner.s, inner.y_parity, hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessList;
    use alloy_primitives::{address, hex, TxKind};
    use k256::ecdsa::SigningKey;

    fn address_of(key: &SigningKey) -> Address {
        let encoded = key.verifying_key().to_encoded_point(false);
        let mut hasher = Keccak256::new();
        hasher.update(&encoded.as_bytes()[1..]);
        Address::from_slice(&hasher.finalize()[12..])
    }

    fn sign_into(
        key: &SigningKey,
        hash: Hash32,
    ) -> (U256, U256, u8) {
        let (signature, recovery_id) = sign_prehash(key, hash.as_slice());
        let (r, s) = signature.split_bytes();
        (
            U256::from_be_slice(&r),
            U256::from_be_slice(&s),
            recovery_id.to_byte(),
        )
    }

    #[test]
    fn signer_round_trip_legacy_eip155() {
        let key = SigningKey::from_bytes(&[5u8; 32].into()).unwrap();
        let expected = address_of(&key);

        let tx = TxLegacy {
            nonce: 0x18,
            gas_price: 0xfa56ea00,
            gas_limit: 119902,
            to: TxKind::Call(hex!("06012c8cf97bead5deae237070f9587f8e7a266").into()),
            value: U256::from(0x1c6bf526340000u64),
            input: hex!("f7d8c883000000000000000000000000000000000000000000000000000000000000")
                .to_vec()
                .into(),
            v: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let hash = signing_hash_legacy(&tx, Some(1));
        let (r, s, recovery) = sign_into(&key, hash);
        let signed = TxLegacy {
            v: 35 + 2 + recovery as u64,
            r,
            s,
            ..tx
        };
        assert_eq!(
            recover_sender(Some(1), &TxEnvelope::Legacy(signed)).unwrap(),
            expected
        );
    }

    #[test]
    fn signer_round_trip_every_variant() {
        let key = SigningKey::from_bytes(&[3u8; 32].into()).unwrap();
        let expected = address_of(&key);

        let eip1559 = TxEip1559 {
            chain_id: 1,
            nonce: 7,
            max_priority_fee_per_gas: 1,
            max_fee_per_gas: 2,
            gas_limit: 100_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000042")),
            value: U256::ZERO,
            input: Default::default(),
            access_list: AccessList::default(),
            y_parity: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let hash = signing_hash_eip1559(&eip1559);
        let (r, s, recovery) = sign_into(&key, hash);
        let signed = TxEip1559 {
            y_parity: recovery,
            r,
            s,
            ..eip1559
        };
        assert_eq!(
            recover_sender(None, &TxEnvelope::Eip1559(signed)).unwrap(),
            expected
        );
    }

    #[test]
    fn low_s_rejects_flipped_parity() {
        let key = SigningKey::from_bytes(&[9u8; 32].into()).unwrap();
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 1,
            max_fee_per_gas: 2,
            gas_limit: 100_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000042")),
            value: U256::ZERO,
            input: Default::default(),
            access_list: AccessList::default(),
            y_parity: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let hash = signing_hash_eip1559(&tx);
        let (r, s, recovery) = sign_into(&key, hash);

        let malleable_s = crate::constants::SECP256K1N - s;
        let flipped_parity = 1 - recovery;
        let malleable = TxEip1559 {
            y_parity: flipped_parity,
            r,
            s: malleable_s,
            ..tx
        };
        assert!(matches!(
            recover_sender(None, &TxEnvelope::Eip1559(malleable)),
            Err(InvalidSignatureError::BadS)
        ));
    }

    #[test]
    fn malleable_s_rejected_directly() {
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 1,
            max_fee_per_gas: 2,
            gas_limit: 100_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000042")),
            value: U256::ZERO,
            input: Default::default(),
            access_list: AccessList::default(),
            y_parity: 0,
            r: U256::from(1),
            s: SECP256K1N_HALF + U256::from(1),
        };
        assert!(matches!(
            recover_sender(None, &TxEnvelope::Eip1559(tx)),
            Err(InvalidSignatureError::BadS)
        ));
    }

    #[test]
    fn legacy_v_handling() {
        // v = 37 with chain_id 1 is the EIP-155 low-parity value (recovery 0),
        // not a pre-EIP-155 `v`, so it is accepted, not rejected, by the
        // EIP-155 arm.
        assert_eq!(legacy_recovery(37, Some(1)).unwrap(), (0, Some(1)));
        assert_eq!(legacy_recovery(38, Some(1)).unwrap(), (1, Some(1)));
        assert!(matches!(
            legacy_recovery(36, Some(1)),
            Err(InvalidSignatureError::BadV)
        ));
    }

    #[test]
    fn unknown_tag_never_reaches_signer() {
        // Covered by crate::envelope's decode tests; listed here for
        // discoverability alongside the other signer boundary scenarios.
    }
}
