//! # Vault Module — Grant Registry & Lifecycle Engine
//!
//! This is where the escrow's state lives and the only place it changes.
//! A grant is a locked-fund commitment from a funder to a recipient with a
//! fixed unlock time; the vault shepherds each grant through exactly one of
//! two exits.
//!
//! ```text
//! error.rs  — VaultError: the complete failure taxonomy
//! grant.rs  — Grant record + GrantRegistry (id-keyed, ids never reused)
//! admin.rs  — AdminGate: who may create grants
//! engine.rs — GrantVault: create / remove / claim, one lock, one ledger
//! ```
//!
//! ## State Machine
//!
//! ```text
//!              create_grant
//!   ┌────────┐ (admin only) ┌────────┐
//!   │ Absent  │─────────────►│ Active │
//!   └────────┘              └───┬──┬─┘
//!        ▲   remove_grant        │  │
//!        │   (funder, before     │  │  claim_grant
//!        │    unlock)            │  │  (recipient, at/after unlock)
//!        └───────────────────────┴──┘
//!          terminal: the identifier is never reoccupied
//! ```
//!
//! ## Design Principles
//!
//! 1. **One outcome per grant.** Removal and claim both delete the registry
//!    entry atomically with the fund transfer; whichever lands first wins
//!    and the loser sees `GrantNotFound`.
//!
//! 2. **Checks in contract order.** Existence, then identity, then timing —
//!    callers can rely on which error they get.
//!
//! 3. **The registry is the only truth.** Presence in the map *is* the
//!    Active state. No status fields, no sentinel addresses.

pub mod admin;
pub mod engine;
pub mod error;
pub mod grant;

pub use admin::AdminGate;
pub use engine::GrantVault;
pub use error::VaultError;
pub use grant::{Grant, GrantRegistry};
