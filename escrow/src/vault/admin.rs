//! # AdminGate — Who May Create Grants
//!
//! Grant creation is a privileged operation: exactly one administrator
//! identity holds the capability at any time. The gate is an explicit
//! configuration value set when the vault is constructed and checked by
//! reference on every privileged call — there is no ambient or global
//! lookup anywhere in the crate.

use serde::{Deserialize, Serialize};

use crate::ledger::Address;

use super::error::VaultError;

/// The single-administrator authorization gate.
///
/// Lives inside the vault's locked state, so reads and handoffs are
/// serialized with the lifecycle operations they guard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminGate {
    /// The identity currently authorized to create grants.
    administrator: Address,
}

impl AdminGate {
    /// Creates a gate held by `administrator`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidAddress`] if `administrator` is the
    /// null identity — a vault nobody can administer is a deployment bug.
    pub fn new(administrator: Address) -> Result<Self, VaultError> {
        if administrator.is_null() {
            return Err(VaultError::InvalidAddress {
                role: "administrator",
            });
        }
        Ok(Self { administrator })
    }

    /// Returns the current administrator.
    pub fn current(&self) -> &Address {
        &self.administrator
    }

    /// Checks that `caller` is the administrator. No side effects.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] otherwise.
    pub fn require(&self, caller: &Address) -> Result<(), VaultError> {
        if caller != &self.administrator {
            return Err(VaultError::Unauthorized {
                expected: self.administrator.clone(),
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Hands the gate to `new_administrator`.
    ///
    /// Single-step: the current administrator names a successor and the
    /// handoff is immediate.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] if `caller` is not the current
    /// administrator, and [`VaultError::InvalidAddress`] if the successor
    /// is the null identity.
    pub fn transfer(
        &mut self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<(), VaultError> {
        self.require(caller)?;
        if new_administrator.is_null() {
            return Err(VaultError::InvalidAddress {
                role: "administrator",
            });
        }
        self.administrator = new_administrator;
        Ok(())
    }
}
