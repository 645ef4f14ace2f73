//! Intrinsic gas accounting: the minimum gas a transaction must carry
//! before a single EVM opcode runs, plus the EIP-7623 calldata floor.
//!
//! Grounded on `interpreter/src/gas/calc.rs::validate_initial_tx_gas` in the
//! collaborator codebase, generalized from that function's `(input,
//! is_create, access_list)` triple to a full [`TxEnvelope`] and extended
//! with the EIP-7623 floor and EIP-7702 authorization cost that function
//! predates.

use crate::constants::{
    init_code_cost, FLOOR_CALLDATA_COST, MAX_CODE_SIZE, PER_EMPTY_ACCOUNT_COST,
    STANDARD_CALLDATA_TOKEN_COST, TX_ACCESS_LIST_ADDRESS_COST, TX_ACCESS_LIST_STORAGE_KEY_COST,
    TX_BASE_COST, TX_CREATE_COST,
};
use crate::error::InvalidTransaction;
use crate::transaction::TxEnvelope;
use alloy_primitives::TxKind;

/// The two gas figures a validator needs before admitting a transaction:
/// the minimum it must carry ([`Self::intrinsic_gas`]) and the EIP-7623
/// floor ([`Self::floor_gas`]). A transaction is admissible only if its gas
/// limit covers the larger of the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitialAndFloorGas {
    /// Minimum gas charged before execution: base cost, calldata cost,
    /// creation cost, access-list cost, and authorization cost.
    pub intrinsic_gas: u64,
    /// EIP-7623 calldata floor: `tokens * FLOOR_CALLDATA_COST + TX_BASE_COST`.
    pub floor_gas: u64,
}

/// Counts EIP-7623 "tokens" in calldata: zero bytes weigh one token each,
/// nonzero bytes weigh four.
fn tokens_in_calldata(data: &[u8]) -> u128 {
    let zero_bytes = data.iter().filter(|&&b| b == 0).count() as u128;
    let non_zero_bytes = data.len() as u128 - zero_bytes;
    zero_bytes + STANDARD_CALLDATA_TOKEN_COST as u128 * non_zero_bytes
}

/// Step 6: `Σ_a (TX_ACCESS_LIST_ADDRESS_COST + len(a.slots) * TX_ACCESS_LIST_STORAGE_KEY_COST)`.
/// Duplicate accounts and duplicate slots are billed, never deduplicated.
fn access_list_cost(tx: &TxEnvelope) -> u128 {
    let Some(access_list) = tx.access_list() else {
        return 0;
    };
    access_list.iter().fold(0u128, |cost, item| {
        cost + TX_ACCESS_LIST_ADDRESS_COST as u128
            + item.storage_keys.len() as u128 * TX_ACCESS_LIST_STORAGE_KEY_COST as u128
    })
}

/// Narrows a `u128` gas accumulation to `u64`, the width gas is charged and
/// compared everywhere else in the client. This narrowing must be fallible,
/// never a silent wrap or saturation.
fn narrow(value: u128) -> Result<u64, InvalidTransaction> {
    u64::try_from(value).map_err(|_| InvalidTransaction::GasOverflow)
}

/// Computes [`InitialAndFloorGas`] for `tx`. Pure: no
/// validation, no error path — a transaction this large simply reports a
/// correspondingly large cost. Width overflow past `u64` is handled by
/// [`validate_transaction`], which is the only caller in this crate that
/// needs to reject rather than merely report.
pub fn calculate_intrinsic_cost(tx: &TxEnvelope) -> InitialAndFloorGas {
    let tokens = tokens_in_calldata(tx.input());

    let floor_gas = tokens * FLOOR_CALLDATA_COST as u128 + TX_BASE_COST as u128;
    let data_cost = tokens * STANDARD_CALLDATA_TOKEN_COST as u128;

    let create_cost = if matches!(tx.to(), TxKind::Create) {
        TX_CREATE_COST as u128 + init_code_cost(tx.input().len()) as u128
    } else {
        0
    };

    let auth_cost = tx.authorization_list_len() as u128 * PER_EMPTY_ACCOUNT_COST as u128;

    let intrinsic_gas =
        TX_BASE_COST as u128 + data_cost + create_cost + access_list_cost(tx) + auth_cost;

    InitialAndFloorGas {
        intrinsic_gas: narrow(intrinsic_gas).unwrap_or(u64::MAX),
        floor_gas: narrow(floor_gas).unwrap_or(u64::MAX),
    }
}

/// [`calculate_intrinsic_cost`] plus the structural checks required
/// before a transaction is admitted: sufficient gas, a nonce under the
/// EIP-2681 cap, and (for contract creation) calldata under the EIP-3860
/// limit.
pub fn validate_transaction(tx: &TxEnvelope) -> Result<InitialAndFloorGas, InvalidTransaction> {
    if tx.nonce() >= u64::MAX as u128 {
        return Err(InvalidTransaction::NonceTooHigh);
    }

    if matches!(tx.to(), TxKind::Create) && tx.input().len() > 2 * MAX_CODE_SIZE {
        return Err(InvalidTransaction::CreateInitCodeSizeLimit);
    }

    let gas = calculate_intrinsic_cost(tx);
    let gas_limit = tx.gas_limit();
    let required = gas.intrinsic_gas.max(gas.floor_gas);
    if required > gas_limit {
        return Err(InvalidTransaction::InsufficientGas {
            required,
            gas_limit,
        });
    }

    Ok(gas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessList, AccessListItem};
    use crate::transaction::{TxEip1559, TxLegacy};
    use alloc::vec;
    use alloy_primitives::{address, b256, Bytes, TxKind, U256};

    fn legacy_with(to: TxKind, input: Bytes) -> TxEnvelope {
        TxEnvelope::Legacy(TxLegacy {
            nonce: 0,
            gas_price: 1,
            gas_limit: 10_000_000,
            to,
            value: U256::ZERO,
            input,
            v: 27,
            r: U256::from(1),
            s: U256::from(1),
        })
    }

    #[test]
    fn base_cost_baseline() {
        let tx = legacy_with(
            TxKind::Call(address!("0000000000000000000000000000000000000000")),
            Bytes::new(),
        );
        let gas = calculate_intrinsic_cost(&tx);
        assert_eq!(gas.intrinsic_gas, 21_000);
        assert_eq!(gas.floor_gas, 21_000);
    }

    #[test]
    fn floor_dominance() {
        let mut tx = TxEip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 0,
            max_fee_per_gas: 0,
            gas_limit: 25_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000001")),
            value: U256::ZERO,
            input: vec![0xffu8; 100].into(),
            access_list: AccessList::default(),
            y_parity: 0,
            r: U256::from(1),
            s: U256::from(1),
        };
        let envelope = TxEnvelope::Eip1559(tx.clone());
        let gas = calculate_intrinsic_cost(&envelope);
        assert_eq!(gas.intrinsic_gas, 22_600);
        assert_eq!(gas.floor_gas, 25_000);
        assert!(validate_transaction(&envelope).is_ok());

        tx.gas_limit = 24_999;
        let envelope = TxEnvelope::Eip1559(tx);
        assert!(matches!(
            validate_transaction(&envelope),
            Err(InvalidTransaction::InsufficientGas {
                required: 25_000,
                gas_limit: 24_999
            })
        ));
    }

    #[test]
    fn creation_cost_includes_init_code_metering() {
        let tx = legacy_with(TxKind::Create, Bytes::from_static(&[0x60, 0x01]));
        let gas = calculate_intrinsic_cost(&tx);
        assert_eq!(gas.intrinsic_gas, 21_000 + 2 * 4 + 32_000 + init_code_cost(2));
    }

    #[test]
    fn oversized_init_code_rejected() {
        let tx = legacy_with(
            TxKind::Create,
            vec![0u8; 2 * MAX_CODE_SIZE + 1].into(),
        );
        assert!(matches!(
            validate_transaction(&tx),
            Err(InvalidTransaction::CreateInitCodeSizeLimit)
        ));
    }

    #[test]
    fn nonce_cap() {
        let mut tx = legacy_with(
            TxKind::Call(address!("0000000000000000000000000000000000000001")),
            Bytes::new(),
        );
        if let TxEnvelope::Legacy(inner) = &mut tx {
            inner.nonce = u64::MAX;
        }
        assert!(matches!(
            validate_transaction(&tx),
            Err(InvalidTransaction::NonceTooHigh)
        ));
    }

    #[test]
    fn gas_is_strictly_monotonic_in_calldata() {
        let base = legacy_with(
            TxKind::Call(address!("0000000000000000000000000000000000000001")),
            Bytes::new(),
        );
        let mut extended_data = vec![0x01u8];
        let mut extended = base.clone();
        if let TxEnvelope::Legacy(inner) = &mut extended {
            inner.input = core::mem::take(&mut extended_data).into();
        }
        assert!(
            calculate_intrinsic_cost(&extended).intrinsic_gas
                > calculate_intrinsic_cost(&base).intrinsic_gas
        );
    }

    #[test]
    fn access_list_linearity() {
        let item_a = AccessListItem {
            address: address!("0000000000000000000000000000000000000001"),
            storage_keys: vec![b256!(
                "0000000000000000000000000000000000000000000000000000000000000001"
            )],
        };
        let item_b = AccessListItem {
            address: address!("0000000000000000000000000000000000000002"),
            storage_keys: vec![
                b256!("0000000000000000000000000000000000000000000000000000000000000001"),
                b256!("0000000000000000000000000000000000000000000000000000000000000002"),
            ],
        };

        let mut tx_a = TxEip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 0,
            max_fee_per_gas: 0,
            gas_limit: 1_000_000,
            to: TxKind::Call(address!("0000000000000000000000000000000000000003")),
            value: U256::ZERO,
            input: Bytes::new(),
            access_list: AccessList(vec![item_a.clone()]),
            y_parity: 0,
            r: U256::from(1),
            s: U256::from(1),
        };
        let gas_a = calculate_intrinsic_cost(&TxEnvelope::Eip1559(tx_a.clone())).intrinsic_gas;

        tx_a.access_list = AccessList(vec![item_a, item_b]);
        let gas_ab = calculate_intrinsic_cost(&TxEnvelope::Eip1559(tx_a)).intrinsic_gas;

        assert_eq!(gas_ab - gas_a, 2_400 + 1_900 * 2);
    }
}
