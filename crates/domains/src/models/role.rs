//! Board membership roles and their privilege order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Privilege tier on a board: `Owner > Admin > Member > Viewer`.
///
/// Variants are declared lowest first so the derived `Ord` matches the
/// privilege order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Viewer,
    Member,
    Admin,
    Owner,
}

impl Role {
    /// Roles a membership row may carry. `Owner` is derived from
    /// `Board::owner_id` and never stored.
    pub const ASSIGNABLE: [Role; 3] = [Role::Admin, Role::Member, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Viewer => "VIEWER",
        }
    }

    pub fn is_assignable(&self) -> bool {
        match self {
            Self::Admin | Self::Member | Self::Viewer => true,
            Self::Owner => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    /// Case-insensitive; anything outside the closed set is a validation error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(DomainError::validation(format!(
                "Invalid role: {s} (expected one of {})",
                Role::ASSIGNABLE.map(|r| r.as_str()).join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn privilege_order_is_total() {
        assert!(Role::Owner > Role::Admin);
        assert!(Role::Admin > Role::Member);
        assert!(Role::Member > Role::Viewer);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Viewer ".parse::<Role>().unwrap(), Role::Viewer);
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "validation error: Invalid role: superuser (expected one of ADMIN, MEMBER, VIEWER)"
        );
    }

    #[test]
    fn owner_is_never_assignable() {
        assert!(!Role::Owner.is_assignable());
        assert!(Role::ASSIGNABLE.iter().all(Role::is_assignable));
    }

    #[test]
    fn serializes_as_upper_case() {
        assert_eq!(serde_json::to_value(Role::Member).unwrap(), "MEMBER");
    }
}
