//! # In-Memory Reference Ledger
//!
//! A complete, self-contained fungible-token ledger: balances, capped
//! allowances, minting, and the [`TokenLedger`] movement interface. This is
//! what the vault runs against in tests and single-process deployments;
//! production deployments substitute the network's real ledger behind the
//! same trait.
//!
//! The whole book derives `Serialize`/`Deserialize`, so a ledger snapshot
//! can be persisted or shipped across the wire as a single blob.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::UNLIMITED_ALLOWANCE;

use super::address::Address;
use super::transfer::{LedgerError, TokenLedger};

/// An in-process token ledger with capped-allowance semantics.
///
/// # Thread Safety
///
/// `InMemoryLedger` is `Send` but takes `&mut self` for every mutation —
/// concurrent access is coordinated by whoever owns it (the vault wraps it
/// in a `parking_lot::Mutex`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Account balances in smallest units. Absent means zero.
    balances: HashMap<Address, u64>,

    /// Pre-authorized transfer caps: owner -> spender -> cap.
    /// Absent means zero. [`UNLIMITED_ALLOWANCE`] is never decremented.
    allowances: HashMap<Address, HashMap<Address, u64>>,

    /// Sum of everything ever minted. Conservation invariant: the balances
    /// always sum to this value — transfers move money, they don't make it.
    total_supply: u64,
}

impl InMemoryLedger {
    /// Creates an empty ledger: no accounts, no allowances, zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` new units into `to`'s balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] if either the destination
    /// balance or the total supply would exceed `u64::MAX`.
    pub fn mint(&mut self, to: &Address, amount: u64) -> Result<u64, LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account: to.clone(),
                current: self.total_supply,
                credit: amount,
            })?;

        let new_balance = self.credit(to, amount)?;
        self.total_supply = supply;
        Ok(new_balance)
    }

    /// Sets `owner`'s allowance to `spender` to exactly `amount`.
    ///
    /// Overwrites any previous allowance; approving zero revokes it.
    /// Pass [`UNLIMITED_ALLOWANCE`] to opt out of per-transfer accounting.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(owner) {
                spenders.remove(spender);
                if spenders.is_empty() {
                    self.allowances.remove(owner);
                }
            }
        } else {
            self.allowances
                .entry(owner.clone())
                .or_default()
                .insert(spender.clone(), amount);
        }
    }

    /// Returns `owner`'s current allowance to `spender`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Moves `amount` from `from` to `to` with no allowance involved.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `from`'s balance does
    /// not cover the transfer.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        // Cannot overflow: the debited amount already fit inside the supply.
        self.credit(to, amount)?;
        Ok(())
    }

    /// Returns the sum of everything ever minted.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Returns the number of accounts holding a balance entry.
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }

    // -----------------------------------------------------------------------
    // Internal Helpers
    // -----------------------------------------------------------------------

    fn credit(&mut self, account: &Address, amount: u64) -> Result<u64, LedgerError> {
        let balance = self.balances.entry(account.clone()).or_insert(0);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account: account.clone(),
                current: *balance,
                credit: amount,
            })?;
        *balance = new_balance;
        Ok(new_balance)
    }

    fn debit(&mut self, account: &Address, amount: u64) -> Result<u64, LedgerError> {
        let available = self.balances.get(account).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: account.clone(),
                available,
                requested: amount,
            });
        }
        let remaining = available - amount;
        self.balances.insert(account.clone(), remaining);
        Ok(remaining)
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn pull(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        // Allowance first, then balance: an unauthorized pull is rejected
        // before the ledger looks at funds at all.
        let authorized = self.allowance(from, to);
        if authorized < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: to.clone(),
                authorized,
                requested: amount,
            });
        }

        self.transfer(from, to, amount)?;

        // An unlimited allowance is a standing authorization; anything
        // smaller is spent down.
        if authorized != UNLIMITED_ALLOWANCE {
            self.approve(from, to, authorized - amount);
        }
        Ok(())
    }

    fn push(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        self.transfer(from, to, amount)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.account_count(), 0);
        assert_eq!(ledger.balance_of(&addr("nova:a")), 0);
    }

    #[test]
    fn mint_credits_balance_and_supply() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");

        let balance = ledger.mint(&alice, 5_000).unwrap();
        assert_eq!(balance, 5_000);
        assert_eq!(ledger.balance_of(&alice), 5_000);
        assert_eq!(ledger.total_supply(), 5_000);
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");

        ledger.mint(&alice, u64::MAX).unwrap();
        let result = ledger.mint(&alice, 1);
        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        // Failed mint must not change the books.
        assert_eq!(ledger.total_supply(), u64::MAX);
        assert_eq!(ledger.balance_of(&alice), u64::MAX);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let bob = addr("nova:bob");

        ledger.mint(&alice, 1_000).unwrap();
        ledger.transfer(&alice, &bob, 400).unwrap();

        assert_eq!(ledger.balance_of(&alice), 600);
        assert_eq!(ledger.balance_of(&bob), 400);
        assert_eq!(ledger.total_supply(), 1_000);
    }

    #[test]
    fn transfer_insufficient_funds_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let bob = addr("nova:bob");

        ledger.mint(&alice, 100).unwrap();
        let result = ledger.transfer(&alice, &bob, 200);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                available: 100,
                requested: 200,
                ..
            })
        ));
        // Nothing moved.
        assert_eq!(ledger.balance_of(&alice), 100);
        assert_eq!(ledger.balance_of(&bob), 0);
    }

    #[test]
    fn transfer_from_unknown_account_rejected() {
        let mut ledger = InMemoryLedger::new();
        let result = ledger.transfer(&addr("nova:ghost"), &addr("nova:bob"), 1);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { available: 0, .. })
        ));
    }

    #[test]
    fn approve_and_query_allowance() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        assert_eq!(ledger.allowance(&alice, &vault), 0);
        ledger.approve(&alice, &vault, 500);
        assert_eq!(ledger.allowance(&alice, &vault), 500);

        // Approving zero revokes.
        ledger.approve(&alice, &vault, 0);
        assert_eq!(ledger.allowance(&alice, &vault), 0);
    }

    #[test]
    fn pull_spends_allowance() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 1_000).unwrap();
        ledger.approve(&alice, &vault, 600);

        ledger.pull(&alice, &vault, 400).unwrap();
        assert_eq!(ledger.balance_of(&alice), 600);
        assert_eq!(ledger.balance_of(&vault), 400);
        assert_eq!(ledger.allowance(&alice, &vault), 200);
    }

    #[test]
    fn pull_without_allowance_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 1_000).unwrap();
        let result = ledger.pull(&alice, &vault, 400);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance {
                authorized: 0,
                requested: 400,
                ..
            })
        ));
        assert_eq!(ledger.balance_of(&alice), 1_000);
    }

    #[test]
    fn pull_beyond_allowance_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 1_000).unwrap();
        ledger.approve(&alice, &vault, 300);

        let result = ledger.pull(&alice, &vault, 301);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientAllowance { .. })
        ));
        assert_eq!(ledger.allowance(&alice, &vault), 300);
    }

    #[test]
    fn pull_with_allowance_but_no_funds_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 100).unwrap();
        ledger.approve(&alice, &vault, 500);

        let result = ledger.pull(&alice, &vault, 200);
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        // A failed pull spends no allowance.
        assert_eq!(ledger.allowance(&alice, &vault), 500);
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 10_000).unwrap();
        ledger.approve(&alice, &vault, UNLIMITED_ALLOWANCE);

        ledger.pull(&alice, &vault, 4_000).unwrap();
        ledger.pull(&alice, &vault, 4_000).unwrap();

        assert_eq!(ledger.allowance(&alice, &vault), UNLIMITED_ALLOWANCE);
        assert_eq!(ledger.balance_of(&vault), 8_000);
    }

    #[test]
    fn exact_allowance_spends_to_zero() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 500).unwrap();
        ledger.approve(&alice, &vault, 500);
        ledger.pull(&alice, &vault, 500).unwrap();

        assert_eq!(ledger.allowance(&alice, &vault), 0);
        assert_eq!(ledger.balance_of(&vault), 500);
    }

    #[test]
    fn push_moves_custody_funds() {
        let mut ledger = InMemoryLedger::new();
        let vault = addr("nova:vault");
        let bob = addr("nova:bob");

        ledger.mint(&vault, 1_000).unwrap();
        ledger.push(&vault, &bob, 750).unwrap();

        assert_eq!(ledger.balance_of(&vault), 250);
        assert_eq!(ledger.balance_of(&bob), 750);
    }

    #[test]
    fn push_insufficient_custody_rejected() {
        let mut ledger = InMemoryLedger::new();
        let vault = addr("nova:vault");
        let bob = addr("nova:bob");

        ledger.mint(&vault, 100).unwrap();
        let result = ledger.push(&vault, &bob, 101);
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[test]
    fn supply_is_conserved_across_transfers() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let bob = addr("nova:bob");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 3_000).unwrap();
        ledger.mint(&bob, 2_000).unwrap();
        ledger.approve(&alice, &vault, 1_000);
        ledger.pull(&alice, &vault, 1_000).unwrap();
        ledger.push(&vault, &bob, 500).unwrap();

        let held = ledger.balance_of(&alice) + ledger.balance_of(&bob) + ledger.balance_of(&vault);
        assert_eq!(held, ledger.total_supply());
    }

    #[test]
    fn ledger_serialization_roundtrip() {
        let mut ledger = InMemoryLedger::new();
        let alice = addr("nova:alice");
        let vault = addr("nova:vault");

        ledger.mint(&alice, 9_000).unwrap();
        ledger.approve(&alice, &vault, 4_500);

        let json = serde_json::to_string(&ledger).expect("serialize");
        let recovered: InMemoryLedger = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(recovered.balance_of(&alice), 9_000);
        assert_eq!(recovered.allowance(&alice, &vault), 4_500);
        assert_eq!(recovered.total_supply(), 9_000);
    }
}
