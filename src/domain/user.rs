//! Users and the capability model.
//!
//! Authorization is coarse and trust-based: team-wide role flags imply a
//! baseline set of capabilities, and explicit grants stack on top. EICs
//! hold everything.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A privileged operation a user may be allowed to perform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Set any puzzle to any status. Held by every team member.
    ChangeStatus,
    /// Remove a user from a puzzle's spoiled set.
    Unspoil,
    /// Close a testsolve session for everyone.
    CloseSession,
    /// Start a testsolve on a puzzle that is past testsolving.
    LateTestsolve,
    /// Create and edit rounds and answers.
    EditRounds,
}

/// A team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Editor-in-chief: implicitly spoiled on everything, holds every
    /// capability.
    pub eic: bool,
    /// Team-wide editor flag.
    pub editor: bool,
    /// Testsolve coordinator flag.
    pub testsolve_coordinator: bool,
    /// Explicit capability grants beyond the role-implied ones.
    pub capabilities: BTreeSet<Capability>,
}

impl User {
    /// Whether the user may perform a privileged operation.
    pub fn has_capability(&self, capability: Capability) -> bool {
        if self.eic || self.capabilities.contains(&capability) {
            return true;
        }
        match capability {
            // Any team member may set any status; the workflow runs on trust.
            Capability::ChangeStatus => true,
            Capability::CloseSession | Capability::LateTestsolve => self.testsolve_coordinator,
            Capability::EditRounds => self.editor,
            Capability::Unspoil => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "test".to_owned(),
            eic: false,
            editor: false,
            testsolve_coordinator: false,
            capabilities: BTreeSet::new(),
        }
    }

    #[test]
    fn fresh_user_has_no_privileges() {
        let u = user();
        assert!(!u.has_capability(Capability::Unspoil));
        assert!(!u.has_capability(Capability::CloseSession));
        assert!(!u.has_capability(Capability::EditRounds));
        // Status changes are open to everyone.
        assert!(u.has_capability(Capability::ChangeStatus));
    }

    #[test]
    fn eic_holds_everything() {
        let mut u = user();
        u.eic = true;
        for cap in [
            Capability::ChangeStatus,
            Capability::Unspoil,
            Capability::CloseSession,
            Capability::LateTestsolve,
            Capability::EditRounds,
        ] {
            assert!(u.has_capability(cap));
        }
    }

    #[test]
    fn coordinator_can_close_and_run_late_sessions() {
        let mut u = user();
        u.testsolve_coordinator = true;
        assert!(u.has_capability(Capability::CloseSession));
        assert!(u.has_capability(Capability::LateTestsolve));
        assert!(!u.has_capability(Capability::Unspoil));
    }

    #[test]
    fn explicit_grants_stack_on_roles() {
        let mut u = user();
        u.editor = true;
        u.capabilities.insert(Capability::Unspoil);
        assert!(u.has_capability(Capability::EditRounds));
        assert!(u.has_capability(Capability::Unspoil));
        assert!(!u.has_capability(Capability::CloseSession));
    }
}
