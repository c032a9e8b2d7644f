//! # Escrow Configuration & Constants
//!
//! Every magic number in the escrow crate lives here. If you're hardcoding
//! a constant somewhere else, you're doing it wrong and you owe the team
//! coffee.

// ---------------------------------------------------------------------------
// Ledger Parameters
// ---------------------------------------------------------------------------

/// The allowance value that means "unlimited".
///
/// An owner who approves this amount to a spender is opting out of
/// per-transfer accounting: the ledger does not decrement an unlimited
/// allowance on `pull`. Any smaller value is a capped allowance and is
/// spent down transfer by transfer.
pub const UNLIMITED_ALLOWANCE: u64 = u64::MAX;

// ---------------------------------------------------------------------------
// Grant Parameters
// ---------------------------------------------------------------------------

/// The identifier assigned to the first grant a vault ever creates.
///
/// Identifiers count up from here, one per successful creation, and are
/// never reused — a finalized grant's identifier stays dead forever.
pub const FIRST_GRANT_ID: u64 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_allowance_is_the_maximum() {
        // The sentinel must be unreachable by honest accounting: no capped
        // allowance can ever be spent *up* into the unlimited value.
        assert_eq!(UNLIMITED_ALLOWANCE, u64::MAX);
    }

    #[test]
    fn grant_ids_start_at_zero() {
        assert_eq!(FIRST_GRANT_ID, 0);
    }
}
