use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Authorization role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Member,
    Trainer,
}

impl Role {
    /// All roles, ordered by name.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::Trainer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Member => "Member",
            Role::Trainer => "Trainer",
        }
    }

    /// Roles whose name contains `term`, ignoring case.
    pub fn matching(term: &str) -> Vec<Role> {
        let term = term.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|role| role.as_str().to_lowercase().contains(&term))
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| DomainError::Validation(format!("Role '{}' does not exist.", name)))
    }
}
