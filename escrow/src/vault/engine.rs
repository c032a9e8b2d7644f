//! # GrantVault — The Lifecycle Engine
//!
//! The three state-changing operations of the escrow — create, remove,
//! claim — and nothing else. Each one is a single transaction: every
//! precondition check, the registry mutation, and the ledger transfer all
//! happen while the engine's lock is held, so no observer ever sees a
//! half-applied grant.
//!
//! ## Ordering
//!
//! Creation transfers first and mutates second: the funder's tokens are
//! pulled into custody *before* the grant is inserted, so a rejected pull
//! leaves the registry untouched with no rollback machinery.
//!
//! Removal and claim mutate first and transfer second: the registry entry
//! is deleted *before* the payout, so the grant is never observable as
//! active while funds are in flight. If the payout fails the entry is
//! restored under the same lock — from outside, either both effects
//! happened or neither did.
//!
//! ## Lock Order
//!
//! The engine holds two locks: its own state (admin gate + registry) and
//! the shared ledger. Every path acquires state first, ledger second, and
//! the ledger lock is released before the state lock. Keep it that way.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ledger::{Address, TokenLedger};

use super::admin::AdminGate;
use super::error::VaultError;
use super::grant::{Grant, GrantRegistry};

// ---------------------------------------------------------------------------
// VaultState
// ---------------------------------------------------------------------------

/// Everything behind the transactional boundary: the authorization gate,
/// the registry, and (inside the registry) the identifier counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct VaultState {
    admin: AdminGate,
    registry: GrantRegistry,
}

// ---------------------------------------------------------------------------
// GrantVault
// ---------------------------------------------------------------------------

/// A time-locked grant escrow vault.
///
/// The vault owns a custody account on a shared token ledger. Funds enter
/// custody when a grant is created and leave it exactly once — back to the
/// funder on removal, or on to the recipient on claim.
///
/// # Thread Safety
///
/// All operations take `&self`; the vault is `Send + Sync` (given `L:
/// Send`) and is meant to be shared behind an `Arc`. Serializability comes
/// from one mutex over the whole vault state, not from fine-grained
/// locking — a vault processes one lifecycle operation at a time, which is
/// exactly the semantics the escrow contract promises.
pub struct GrantVault<L: TokenLedger> {
    /// The vault's custody account on the ledger.
    address: Address,

    /// The shared token ledger. Locked second, always.
    ledger: Arc<Mutex<L>>,

    /// Administrator + registry. Locked first, held for each whole
    /// operation.
    state: Mutex<VaultState>,
}

impl<L: TokenLedger> GrantVault<L> {
    /// Creates a vault with custody account `address`, administered by
    /// `administrator`, moving funds on `ledger`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidAddress`] if the custody address or the
    /// administrator is the null identity.
    pub fn new(
        address: Address,
        administrator: Address,
        ledger: Arc<Mutex<L>>,
    ) -> Result<Self, VaultError> {
        if address.is_null() {
            return Err(VaultError::InvalidAddress { role: "vault" });
        }
        let admin = AdminGate::new(administrator)?;
        Ok(Self {
            address,
            ledger,
            state: Mutex::new(VaultState {
                admin,
                registry: GrantRegistry::new(),
            }),
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle Operations
    // -----------------------------------------------------------------------

    /// Creates a grant: locks `amount` of the funder's tokens in custody
    /// until `unlock_at`, claimable by `recipient` from then on.
    ///
    /// Preconditions, checked in order: `caller` is the administrator;
    /// `funder` and `recipient` are non-null (checked independently, so the
    /// two rejections stay distinguishable); `amount` is non-zero. The
    /// funder must have pre-authorized at least `amount` to the vault's
    /// custody account on the ledger.
    ///
    /// Returns the new grant's identifier — sequential from zero, never
    /// reused.
    ///
    /// # Errors
    ///
    /// [`VaultError::Unauthorized`], [`VaultError::InvalidAddress`],
    /// [`VaultError::ZeroAmount`], or [`VaultError::Ledger`] when the pull
    /// is rejected. On any failure the registry is untouched and no funds
    /// move.
    pub fn create_grant(
        &self,
        caller: &Address,
        funder: Address,
        recipient: Address,
        amount: u64,
        unlock_at: DateTime<Utc>,
    ) -> Result<u64, VaultError> {
        let mut state = self.state.lock();
        state.admin.require(caller)?;

        if funder.is_null() {
            return Err(VaultError::InvalidAddress { role: "funder" });
        }
        if recipient.is_null() {
            return Err(VaultError::InvalidAddress { role: "recipient" });
        }
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }

        // Transfer first, mutate second: a rejected pull aborts the whole
        // operation before the registry hears about it.
        self.ledger.lock().pull(&funder, &self.address, amount)?;

        let grant_id = state.registry.insert(Grant {
            funder: funder.clone(),
            recipient: recipient.clone(),
            amount,
            unlock_at,
            created_at: Utc::now(),
        });

        info!(
            grant_id,
            funder = %funder,
            recipient = %recipient,
            amount,
            unlock_at = %unlock_at,
            "grant created"
        );
        Ok(grant_id)
    }

    /// Removes a grant before unlock, refunding the funder.
    ///
    /// Preconditions, checked in order: the grant is active
    /// ([`VaultError::GrantNotFound`]); `caller` is the grant's funder
    /// ([`VaultError::Unauthorized`]); the current time is strictly before
    /// `unlock_at` ([`VaultError::AlreadyUnlocked`]).
    ///
    /// Returns the refunded amount. Afterwards the identifier is dead:
    /// every further removal or claim on it fails with `GrantNotFound`.
    pub fn remove_grant(&self, caller: &Address, grant_id: u64) -> Result<u64, VaultError> {
        let mut state = self.state.lock();

        let now = Utc::now();
        {
            let grant = state
                .registry
                .get(grant_id)
                .ok_or(VaultError::GrantNotFound(grant_id))?;
            if caller != &grant.funder {
                return Err(VaultError::Unauthorized {
                    expected: grant.funder.clone(),
                    caller: caller.clone(),
                });
            }
            if grant.is_unlocked(now) {
                return Err(VaultError::AlreadyUnlocked {
                    grant_id,
                    unlock_at: grant.unlock_at,
                });
            }
        }

        let grant = state
            .registry
            .remove(grant_id)
            .ok_or(VaultError::GrantNotFound(grant_id))?;
        self.finalize(&mut state, grant_id, grant, Beneficiary::Funder)
    }

    /// Claims a grant at or after unlock, paying the recipient.
    ///
    /// Preconditions, checked in order: the grant is active
    /// ([`VaultError::GrantNotFound`]); `caller` is the grant's recipient
    /// ([`VaultError::Unauthorized`]); the current time is at or after
    /// `unlock_at` ([`VaultError::NotYetUnlocked`]).
    ///
    /// Returns the paid amount. Afterwards the identifier is dead, exactly
    /// as with removal.
    pub fn claim_grant(&self, caller: &Address, grant_id: u64) -> Result<u64, VaultError> {
        let mut state = self.state.lock();

        let now = Utc::now();
        {
            let grant = state
                .registry
                .get(grant_id)
                .ok_or(VaultError::GrantNotFound(grant_id))?;
            if caller != &grant.recipient {
                return Err(VaultError::Unauthorized {
                    expected: grant.recipient.clone(),
                    caller: caller.clone(),
                });
            }
            if !grant.is_unlocked(now) {
                return Err(VaultError::NotYetUnlocked {
                    grant_id,
                    unlock_at: grant.unlock_at,
                });
            }
        }

        let grant = state
            .registry
            .remove(grant_id)
            .ok_or(VaultError::GrantNotFound(grant_id))?;
        self.finalize(&mut state, grant_id, grant, Beneficiary::Recipient)
    }

    /// Pays out a just-removed grant and restores it if the payout fails.
    ///
    /// Called with the state lock held and the entry already deleted —
    /// the restore path is what keeps "delete + transfer" atomic for
    /// observers.
    fn finalize(
        &self,
        state: &mut VaultState,
        grant_id: u64,
        grant: Grant,
        beneficiary: Beneficiary,
    ) -> Result<u64, VaultError> {
        let payee = match beneficiary {
            Beneficiary::Funder => &grant.funder,
            Beneficiary::Recipient => &grant.recipient,
        };

        if let Err(e) = self.ledger.lock().push(&self.address, payee, grant.amount) {
            let amount = grant.amount;
            state.registry.restore(grant_id, grant);
            warn!(grant_id, amount, error = %e, "payout failed, grant restored");
            return Err(e.into());
        }

        let amount = grant.amount;
        match beneficiary {
            Beneficiary::Funder => {
                info!(grant_id, funder = %grant.funder, amount, "grant removed, funds returned")
            }
            Beneficiary::Recipient => {
                info!(grant_id, recipient = %grant.recipient, amount, "grant claimed")
            }
        }
        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------------

    /// Returns the current administrator.
    pub fn administrator(&self) -> Address {
        self.state.lock().admin.current().clone()
    }

    /// Hands grant-creation authority to `new_administrator`.
    ///
    /// # Errors
    ///
    /// [`VaultError::Unauthorized`] if `caller` is not the current
    /// administrator; [`VaultError::InvalidAddress`] if the successor is
    /// null.
    pub fn transfer_administration(
        &self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<(), VaultError> {
        let mut state = self.state.lock();
        state.admin.transfer(caller, new_administrator)?;
        info!(administrator = %state.admin.current(), "administration transferred");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns the vault's custody account address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Returns a snapshot of the grant at `grant_id`, or `None` if absent.
    pub fn grant(&self, grant_id: u64) -> Option<Grant> {
        self.state.lock().registry.get(grant_id).cloned()
    }

    /// Returns the number of active grants.
    pub fn grant_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Returns the sum of all active grant amounts — the floor under the
    /// custody balance.
    pub fn total_locked(&self) -> u64 {
        self.state.lock().registry.total_locked()
    }

    /// Returns the vault's current balance on the ledger.
    pub fn custody_balance(&self) -> u64 {
        self.ledger.lock().balance_of(&self.address)
    }

    /// Returns snapshots of all active grants funded by `funder`.
    pub fn grants_for_funder(&self, funder: &Address) -> Vec<(u64, Grant)> {
        self.state
            .lock()
            .registry
            .grants_for_funder(funder)
            .into_iter()
            .map(|(id, g)| (id, g.clone()))
            .collect()
    }

    /// Returns snapshots of all active grants claimable by `recipient`.
    pub fn grants_for_recipient(&self, recipient: &Address) -> Vec<(u64, Grant)> {
        self.state
            .lock()
            .registry
            .grants_for_recipient(recipient)
            .into_iter()
            .map(|(id, g)| (id, g.clone()))
            .collect()
    }
}

/// Which party a finalized grant pays.
#[derive(Clone, Copy)]
enum Beneficiary {
    Funder,
    Recipient,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
