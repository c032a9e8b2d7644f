//! # TokenLedger — The Consumed Movement Interface
//!
//! The narrow slice of a fungible-token ledger the vault actually needs:
//! an authorized pull into custody, an unconditional push out of custody,
//! and a balance query. Mint, burn, approve, and everything else a full
//! ledger does stays on the other side of this trait.
//!
//! ## Allowance Semantics
//!
//! `pull(from, to, amount)` only succeeds if `from` has pre-authorized at
//! least `amount` to `to`. Allowances are capped and pre-set: a successful
//! pull spends the allowance down by the transferred amount, except for the
//! maximal value ([`crate::config::UNLIMITED_ALLOWANCE`]), which is treated
//! as unlimited and never decremented.

use thiserror::Error;

use super::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while moving funds on a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The source account's balance does not cover the transfer.
    #[error("insufficient funds: account {account} holds {available}, transfer needs {requested}")]
    InsufficientFunds {
        /// The account being debited.
        account: Address,
        /// Its current balance.
        available: u64,
        /// The amount the transfer required.
        requested: u64,
    },

    /// The spender's pre-authorized allowance does not cover the pull.
    #[error(
        "insufficient allowance: {owner} authorized {authorized} to {spender}, pull needs {requested}"
    )]
    InsufficientAllowance {
        /// The account whose funds would be pulled.
        owner: Address,
        /// The account attempting the pull.
        spender: Address,
        /// The currently authorized amount.
        authorized: u64,
        /// The amount the pull required.
        requested: u64,
    },

    /// Crediting the destination would overflow its balance.
    ///
    /// If you're hitting this, someone is trying to credit more than
    /// 18.4 quintillion units. That's either a bug or an attack.
    #[error("balance overflow: account {account} at {current}, credit of {credit}")]
    BalanceOverflow {
        /// The account being credited.
        account: Address,
        /// Its balance before the failed credit.
        current: u64,
        /// The amount that caused the overflow.
        credit: u64,
    },
}

// ---------------------------------------------------------------------------
// TokenLedger
// ---------------------------------------------------------------------------

/// The token-movement operations the vault consumes.
///
/// Implementations own all balance and allowance accounting and enforce
/// their own sufficiency checks — callers issue transfers and handle the
/// verdict. Every method either fully applies or fully rejects; a failed
/// transfer leaves the ledger untouched.
pub trait TokenLedger {
    /// Returns the current balance of `account`.
    ///
    /// Accounts the ledger has never seen hold zero.
    fn balance_of(&self, account: &Address) -> u64;

    /// Moves `amount` from `from` to `to`, spending `from`'s pre-set
    /// allowance to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientAllowance`] if `from` has not
    /// authorized at least `amount` to `to`, and
    /// [`LedgerError::InsufficientFunds`] if the authorization is there but
    /// the balance is not.
    fn pull(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Moves `amount` from `from` (the caller's own account — for the vault,
    /// its custody account) to `to`. No allowance is involved.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `from`'s balance does
    /// not cover the transfer.
    fn push(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError>;
}
