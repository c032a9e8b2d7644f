//! # Ledger Module — The Token-Movement Boundary
//!
//! The vault does not do balance accounting. It asks a ledger to move funds
//! and believes the answer. This module defines that boundary:
//!
//! ```text
//! address.rs  — Identity type: opaque addresses, explicit null sentinel
//! transfer.rs — TokenLedger trait + LedgerError: pull, push, balance_of
//! memory.rs   — InMemoryLedger: a complete in-process reference ledger
//! ```
//!
//! ## Design Principles
//!
//! 1. **The ledger enforces its own sufficiency checks.** The vault never
//!    pre-checks balances or allowances — it issues the transfer and
//!    propagates the ledger's verdict unmodified.
//!
//! 2. **Pull is authorized, push is not.** `pull` spends a pre-set allowance
//!    from the source account; `push` spends the vault's own balance. The
//!    asymmetry mirrors who is at risk in each direction.
//!
//! 3. **All amounts are `u64` in smallest-unit denomination.** No floating
//!    point. No decimals in arithmetic.

pub mod address;
pub mod memory;
pub mod transfer;

pub use address::Address;
pub use memory::InMemoryLedger;
pub use transfer::{LedgerError, TokenLedger};
