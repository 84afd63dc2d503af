use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::User;

/// The user on whose behalf an operation runs.
///
/// Passed explicitly into every repository and placement call instead of
/// being read from ambient session state. Authorization is a precondition
/// the caller evaluates with [`Actor::can_access`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id: id.into(),
            is_admin,
        }
    }

    /// Whether this actor may read or modify an object owned by `owner_id`.
    #[must_use]
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin || self.id == owner_id
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.is_admin)
    }
}
