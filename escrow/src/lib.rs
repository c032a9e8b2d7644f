// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Escrow — Time-Locked Grant Vault
//!
//! A custody vault for fungible-token grants. A funder's tokens are locked
//! in the vault until a fixed unlock time; before that moment the funder can
//! reclaim them, after it the designated recipient can claim them. One grant,
//! one outcome — there is no third path.
//!
//! The vault never invents balances and never holds an opinion about the
//! token itself: all fund movement goes through a narrow ledger interface,
//! and the ledger's own sufficiency checks are the final word on whether
//! money moves.
//!
//! ## Architecture
//!
//! - **ledger** — The token-movement boundary: the [`ledger::TokenLedger`]
//!   trait the vault consumes, the [`ledger::Address`] identity type, and an
//!   in-memory reference ledger for tests and single-process deployments.
//! - **vault** — The core: the grant registry, the lifecycle engine, and the
//!   administrator gate. If it mutates a grant, it lives here.
//! - **config** — Protocol constants. One home, no strays.
//!
//! ## Design Philosophy
//!
//! 1. Absence is structural. A grant either exists in the registry or it
//!    doesn't — no sentinel field values standing in for "deleted".
//! 2. All monetary operations check for overflow. Wrapping arithmetic and
//!    money do not mix.
//! 3. Every lifecycle operation is one transaction: all of its checks and
//!    both of its effects (registry + ledger) happen under a single lock.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod ledger;
pub mod vault;
