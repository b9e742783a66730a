use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::user::{Capability, User};

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Editor-in-chief flag.
    #[serde(default)]
    pub eic: bool,
    /// Team-wide editor flag.
    #[serde(default)]
    pub editor: bool,
    /// Testsolve coordinator flag.
    #[serde(default)]
    pub testsolve_coordinator: bool,
    /// Explicit capability grants.
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
}

/// A user as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    /// User id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Editor-in-chief flag.
    pub eic: bool,
    /// Team-wide editor flag.
    pub editor: bool,
    /// Testsolve coordinator flag.
    pub testsolve_coordinator: bool,
    /// Explicit capability grants.
    pub capabilities: BTreeSet<Capability>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            eic: user.eic,
            editor: user.editor,
            testsolve_coordinator: user.testsolve_coordinator,
            capabilities: user.capabilities,
        }
    }
}
