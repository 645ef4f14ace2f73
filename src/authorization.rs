//! EIP-7702 authorization tuples.
//!
//! This crate treats an [`Authorization`] as mostly opaque: its signing-hash
//! and RLP layout are owned by EIP-7702 itself, and the only thing the
//! intrinsic gas calculator needs from it is a count. Sender recovery for
//! the *outer* transaction does not touch authorizations at all; only the
//! authorization's own embedded signature recovers the delegating
//! authority, exposed here for callers that need it (e.g. to warm an
//! account before execution) even though it sits outside this crate's
//! consensus-critical core.

use crate::constants::SECP256K1N_HALF;
use alloc::vec::Vec;
use alloy_primitives::{Address, ChainId, Keccak256, U256};
use alloy_rlp::{BufMut, Encodable, Header, RlpDecodable, RlpEncodable};

/// The magic byte prefixed to an authorization's signing preimage, per
/// EIP-7702: `keccak256(0x05 || rlp([chain_id, address, nonce]))`.
const AUTHORIZATION_MAGIC: u8 = 0x05;

/// An unsigned authorization tuple: "the code at `address` should be
/// delegated-to from the signer's EOA".
#[derive(Clone, Copy, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Authorization {
    /// Chain id the authorization is valid on; zero means "any chain".
    pub chain_id: ChainId,
    /// The address whose code the signer's account delegates to.
    pub address: Address,
    /// Nonce the signer's account must have for this authorization to be
    /// honored.
    pub nonce: u64,
}

impl Authorization {
    fn signing_preimage(&self) -> Vec<u8> {
        let mut body_len = 0usize;
        body_len += self.chain_id.length();
        body_len += self.address.length();
        body_len += self.nonce.length();

        let mut out = Vec::with_capacity(1 + 1 + body_len);
        out.put_u8(AUTHORIZATION_MAGIC);
        Header {
            list: true,
            payload_length: body_len,
        }
        .encode(&mut out);
        self.chain_id.encode(&mut out);
        self.address.encode(&mut out);
        self.nonce.encode(&mut out);
        out
    }

    /// The 32-byte hash an authorizer signs over.
    pub fn signature_hash(&self) -> crate::Hash32 {
        let mut hasher = Keccak256::new();
        hasher.update(self.signing_preimage());
        hasher.finalize()
    }
}

/// A signed [`Authorization`]: the tuple plus its own `(y_parity, r, s)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedAuthorization {
    /// The authorization tuple that was signed.
    #[rlp(flatten)]
    pub inner: Authorization,
    /// Signature y-parity.
    pub y_parity: u8,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl SignedAuthorization {
    /// Recovers the authority address, or `None` if the signature is
    /// malformed, malleable (`s > SECP256K1N / 2`), or does not recover.
    ///
    /// Unlike transaction sender recovery, an invalid authorization is not a
    /// hard error: per EIP-7702 it is simply skipped by the caller.
    #[cfg(feature = "k256")]
    pub fn recover_authority(&self) -> Option<Address> {
        use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

        if self.s > SECP256K1N_HALF || self.y_parity > 1 {
            return None;
        }

        let signature = Signature::from_scalars(
            *k256::FieldBytes::from_slice(&self.r.to_be_bytes::<32>()),
            *k256::FieldBytes::from_slice(&self.s.to_be_bytes::<32>()),
        )
        .ok()?;
        let recovery_id = RecoveryId::from_byte(self.y_parity)?;
        let hash = self.inner.signature_hash();

        let verifying_key =
            VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id).ok()?;
        let encoded = verifying_key.to_encoded_point(false);

        let mut hasher = Keccak256::new();
        hasher.update(&encoded.as_bytes()[1..]);
        Some(Address::from_slice(&hasher.finalize()[12..]))
    }
}

#[cfg(all(test, feature = "k256"))]
mod tests {
    use super::*;
    use crate::signer::sign_prehash;
    use alloy_primitives::address;
    use k256::ecdsa::SigningKey;

    #[test]
    fn authority_round_trip() {
        let key = SigningKey::from_bytes(&[7u8; 32].into()).unwrap();
        let inner = Authorization {
            chain_id: 1,
            address: address!("000000000000000000000000000000000000beef"),
            nonce: 0,
        };
        let hash = inner.signature_hash();
        let (signature, recovery_id) = sign_prehash(&key, hash.as_slice());
        let (r, s) = signature.split_bytes();
        let signed = SignedAuthorization {
            inner,
            y_parity: recovery_id.to_byte(),
            r: U256::from_be_slice(&r),
            s: U256::from_be_slice(&s),
        };

        let expected = Address::from_slice(
            &Keccak256::digest(
                key.verifying_key()
                    .to_encoded_point(false)
                    .as_bytes()[1..]
                    .to_vec(),
            )[12..],
        );
        assert_eq!(signed.recover_authority(), Some(expected));
    }

    #[test]
    fn malleable_authorization_rejected() {
        let inner = Authorization {
            chain_id: 1,
            address: address!("000000000000000000000000000000000000beef"),
            nonce: 0,
        };
        let signed = SignedAuthorization {
            inner,
            y_parity: 0,
            r: U256::from(1),
            s: SECP256K1N_HALF + U256::from(1),
        };
        assert_eq!(signed.recover_authority(), None);
    }
}
