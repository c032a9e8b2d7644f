//! # Grant Record & Registry
//!
//! A [`Grant`] is one locked-fund commitment: who funded it, who may claim
//! it, how much, and when the lock opens. The [`GrantRegistry`] is the
//! indexed collection of every active grant, keyed by a monotonically
//! increasing identifier that is assigned at creation and never reused.
//!
//! Grant existence is map membership. When a grant is finalized it is
//! removed from the map outright — there is no `deleted` flag and no
//! zeroed-out record left behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::FIRST_GRANT_ID;
use crate::ledger::Address;

// ---------------------------------------------------------------------------
// Grant
// ---------------------------------------------------------------------------

/// A single locked-fund commitment.
///
/// All four fields are fixed at creation; a grant is never modified, only
/// finalized. While a grant exists, `funder` and `recipient` are guaranteed
/// non-null — the engine rejects null participants before insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// The identity that supplied the funds. Sole authorizer of removal.
    pub funder: Address,

    /// The identity entitled to claim. Sole authorizer of claim.
    pub recipient: Address,

    /// Locked quantity in smallest units. Pulled in full at creation,
    /// pushed in full at finalization — never split.
    pub amount: u64,

    /// The time boundary: claim is valid at or after this instant,
    /// removal strictly before it.
    pub unlock_at: DateTime<Utc>,

    /// When this grant was created.
    pub created_at: DateTime<Utc>,
}

impl Grant {
    /// Returns `true` if the lock has opened as of `now`.
    ///
    /// The boundary itself counts as unlocked: a claim at exactly
    /// `unlock_at` succeeds, a removal at exactly `unlock_at` fails.
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        now >= self.unlock_at
    }
}

// ---------------------------------------------------------------------------
// GrantRegistry
// ---------------------------------------------------------------------------

/// The indexed collection of active grants.
///
/// Owned and mutated exclusively by the lifecycle engine; everything here
/// is plain bookkeeping with no authorization or ledger logic. Identifiers
/// start at [`FIRST_GRANT_ID`] and count up one per insertion, surviving
/// removals — a finalized grant's identifier is never reoccupied.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GrantRegistry {
    /// Active grants keyed by identifier.
    grants: BTreeMap<u64, Grant>,

    /// The identifier the next insertion will receive.
    next_id: u64,
}

impl GrantRegistry {
    /// Creates an empty registry with the identifier counter at
    /// [`FIRST_GRANT_ID`].
    pub fn new() -> Self {
        Self {
            grants: BTreeMap::new(),
            next_id: FIRST_GRANT_ID,
        }
    }

    /// Inserts a grant, assigns it the next sequential identifier, and
    /// returns that identifier.
    pub fn insert(&mut self, grant: Grant) -> u64 {
        let id = self.next_id;
        self.grants.insert(id, grant);
        self.next_id += 1;
        id
    }

    /// Removes and returns the grant at `id`, or `None` if absent.
    ///
    /// The identifier counter is untouched — removal never frees an id.
    pub fn remove(&mut self, id: u64) -> Option<Grant> {
        self.grants.remove(&id)
    }

    /// Re-inserts a grant under the identifier it was removed with.
    ///
    /// Only the engine's rollback path calls this; `id` must have just been
    /// vacated by [`remove`](Self::remove) and is always below `next_id`.
    pub(crate) fn restore(&mut self, id: u64, grant: Grant) {
        debug_assert!(id < self.next_id);
        self.grants.insert(id, grant);
    }

    /// Returns the grant at `id`, or `None` if absent.
    pub fn get(&self, id: u64) -> Option<&Grant> {
        self.grants.get(&id)
    }

    /// Returns `true` if a grant is active at `id`.
    pub fn contains(&self, id: u64) -> bool {
        self.grants.contains_key(&id)
    }

    /// Returns the number of active grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns `true` if no grants are active.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Returns the identifier the next insertion will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Returns the sum of all active grant amounts.
    ///
    /// This is the custody floor: the vault's ledger balance never falls
    /// below this value while the engine is the only writer.
    pub fn total_locked(&self) -> u64 {
        self.grants.values().map(|g| g.amount).sum()
    }

    /// Returns all active grants funded by `funder`, as `(id, grant)` pairs.
    pub fn grants_for_funder(&self, funder: &Address) -> Vec<(u64, &Grant)> {
        self.grants
            .iter()
            .filter(|(_, g)| &g.funder == funder)
            .map(|(id, g)| (*id, g))
            .collect()
    }

    /// Returns all active grants claimable by `recipient`, as `(id, grant)`
    /// pairs.
    pub fn grants_for_recipient(&self, recipient: &Address) -> Vec<(u64, &Grant)> {
        self.grants
            .iter()
            .filter(|(_, g)| &g.recipient == recipient)
            .map(|(id, g)| (*id, g))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_grant(funder: &str, recipient: &str, amount: u64) -> Grant {
        let now = Utc::now();
        Grant {
            funder: Address::new(funder),
            recipient: Address::new(recipient),
            amount,
            unlock_at: now + Duration::seconds(60),
            created_at: now,
        }
    }

    #[test]
    fn new_registry_is_empty() {
        let reg = GrantRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert_eq!(reg.next_id(), FIRST_GRANT_ID);
        assert_eq!(reg.total_locked(), 0);
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut reg = GrantRegistry::new();
        let a = reg.insert(make_grant("nova:f", "nova:r", 10));
        let b = reg.insert(make_grant("nova:f", "nova:r", 20));
        let c = reg.insert(make_grant("nova:f", "nova:r", 30));

        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.next_id(), 3);
    }

    #[test]
    fn insert_stores_fields_verbatim() {
        let mut reg = GrantRegistry::new();
        let grant = make_grant("nova:funder", "nova:recipient", 42);
        let id = reg.insert(grant.clone());

        let stored = reg.get(id).unwrap();
        assert_eq!(stored, &grant);
    }

    #[test]
    fn remove_makes_grant_absent() {
        let mut reg = GrantRegistry::new();
        let id = reg.insert(make_grant("nova:f", "nova:r", 10));

        let removed = reg.remove(id).unwrap();
        assert_eq!(removed.amount, 10);
        assert!(!reg.contains(id));
        assert!(reg.get(id).is_none());
        // Removing again finds nothing.
        assert!(reg.remove(id).is_none());
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut reg = GrantRegistry::new();
        let first = reg.insert(make_grant("nova:f", "nova:r", 10));
        reg.remove(first);

        let second = reg.insert(make_grant("nova:f", "nova:r", 20));
        assert_eq!(second, first + 1);
        assert!(!reg.contains(first));
    }

    #[test]
    fn restore_reoccupies_the_vacated_id() {
        let mut reg = GrantRegistry::new();
        let id = reg.insert(make_grant("nova:f", "nova:r", 10));
        let grant = reg.remove(id).unwrap();

        reg.restore(id, grant);
        assert!(reg.contains(id));
        assert_eq!(reg.next_id(), 1);
    }

    #[test]
    fn total_locked_sums_active_amounts() {
        let mut reg = GrantRegistry::new();
        reg.insert(make_grant("nova:f", "nova:r", 100));
        let middle = reg.insert(make_grant("nova:f", "nova:r", 250));
        reg.insert(make_grant("nova:f", "nova:r", 50));
        assert_eq!(reg.total_locked(), 400);

        reg.remove(middle);
        assert_eq!(reg.total_locked(), 150);
    }

    #[test]
    fn grants_for_funder_filters() {
        let mut reg = GrantRegistry::new();
        reg.insert(make_grant("nova:alice", "nova:r", 10));
        reg.insert(make_grant("nova:bob", "nova:r", 20));
        reg.insert(make_grant("nova:alice", "nova:r", 30));

        let alice = Address::new("nova:alice");
        let hers = reg.grants_for_funder(&alice);
        assert_eq!(hers.len(), 2);
        assert_eq!(hers[0].0, 0);
        assert_eq!(hers[1].0, 2);
    }

    #[test]
    fn grants_for_recipient_filters() {
        let mut reg = GrantRegistry::new();
        reg.insert(make_grant("nova:f", "nova:carol", 10));
        reg.insert(make_grant("nova:f", "nova:dave", 20));

        let carol = Address::new("nova:carol");
        let hers = reg.grants_for_recipient(&carol);
        assert_eq!(hers.len(), 1);
        assert_eq!(hers[0].1.amount, 10);
    }

    #[test]
    fn unlock_boundary_counts_as_unlocked() {
        let grant = make_grant("nova:f", "nova:r", 10);
        assert!(grant.is_unlocked(grant.unlock_at));
        assert!(grant.is_unlocked(grant.unlock_at + Duration::seconds(1)));
        assert!(!grant.is_unlocked(grant.unlock_at - Duration::seconds(1)));
    }

    #[test]
    fn registry_serialization_roundtrip() {
        let mut reg = GrantRegistry::new();
        reg.insert(make_grant("nova:f", "nova:r", 77));
        let removed = reg.insert(make_grant("nova:f", "nova:r", 88));
        reg.remove(removed);

        let json = serde_json::to_string(&reg).expect("serialize");
        let recovered: GrantRegistry = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered.next_id(), 2);
        assert_eq!(recovered.get(0).unwrap().amount, 77);
    }
}
