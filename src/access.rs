//! The access-list entry type shared by every non-legacy transaction.
//!
//! An entry pairs an address with an ordered, possibly-duplicated sequence
//! of storage slots; order and duplicates both participate in hashing and
//! billing. The wire shape is owned by EIP-2930, so this crate reuses the
//! collaborator's own `alloy-eip2930` types rather than redefining them.

pub use alloy_eip2930::{AccessList, AccessListItem};

/// Total `(accounts, storage slots)` touched by an access list, folded in
/// wire order. Duplicate entries and duplicate slots are counted, not
/// deduplicated, matching the EIP-2930/EIP-2929 billing rule.
pub fn account_and_slot_counts(access_list: &AccessList) -> (u64, u64) {
    access_list
        .iter()
        .fold((0u64, 0u64), |(accounts, slots), item| {
            (accounts + 1, slots + item.storage_keys.len() as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn counts_duplicates() {
        let item = AccessListItem {
            address: address!("0000000000000000000000000000000000000001"),
            storage_keys: alloc::vec![
                b256!("0000000000000000000000000000000000000000000000000000000000000001"),
                b256!("0000000000000000000000000000000000000000000000000000000000000001"),
            ],
        };
        let list = AccessList(alloc::vec![item.clone(), item]);
        assert_eq!(account_and_slot_counts(&list), (2, 4));
    }
}
