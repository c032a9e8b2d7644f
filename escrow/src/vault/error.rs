//! Error types for the grant vault.
//!
//! Every vault operation that can fail returns a [`VaultError`]. This enum
//! is exhaustive over the failure modes of the grant lifecycle; ledger
//! failures surface through the [`VaultError::Ledger`] wrapper unmodified.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ledger::{Address, LedgerError};

/// Errors that can occur during grant lifecycle operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The caller does not hold the identity the operation requires.
    #[error("unauthorized: expected {expected}, called by {caller}")]
    Unauthorized {
        /// The identity the operation requires.
        expected: Address,
        /// The identity that actually called.
        caller: Address,
    },

    /// The null identity was supplied where a real participant is required.
    ///
    /// `role` names which participant slot was null, so a rejected funder
    /// and a rejected recipient remain distinguishable to callers.
    #[error("invalid {role} address: the null identity cannot participate")]
    InvalidAddress {
        /// Which participant slot was null ("funder", "recipient", ...).
        role: &'static str,
    },

    /// The operation targets a grant that is absent — never created, or
    /// already finalized by a removal or claim.
    #[error("grant {0} not found")]
    GrantNotFound(u64),

    /// Removal attempted at or after the unlock time.
    #[error("grant {grant_id} unlocked at {unlock_at}; the removal window has closed")]
    AlreadyUnlocked {
        /// The targeted grant.
        grant_id: u64,
        /// When the grant unlocked.
        unlock_at: DateTime<Utc>,
    },

    /// Claim attempted before the unlock time.
    #[error("grant {grant_id} is still locked until {unlock_at}")]
    NotYetUnlocked {
        /// The targeted grant.
        grant_id: u64,
        /// When the grant becomes claimable.
        unlock_at: DateTime<Utc>,
    },

    /// A zero-amount grant is a no-op and likely indicates a bug in the
    /// caller.
    #[error("zero-amount grants are not permitted")]
    ZeroAmount,

    /// A ledger transfer failed (insufficient funds or allowance).
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
