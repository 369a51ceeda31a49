use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A portal user as resolved from the directory.
///
/// Fetched on every navigation and never cached; immutable for the
/// lifetime of the request that resolved it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Directory row identifier.
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Role,
    /// The SSO identifier (RUT) in normalized form.
    pub external_id: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
