//! User roles
//!
//! Roles are a closed set checked by exact match at the role gate.
//! They are stored as lowercase text in the database and in JWT claims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Author,
}

impl Role {
    /// All roles, in privilege order
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Author];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Author => "author",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "author" => Ok(Role::Author),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error for a role string outside the closed set
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("editor", Role::Editor)]
    #[case("author", Role::Author)]
    fn parses_known_roles(#[case] input: &str, #[case] expected: Role) {
        assert_eq!(input.parse::<Role>().unwrap(), expected);
    }

    #[rstest]
    #[case("Admin")]
    #[case("ADMIN")]
    #[case("superuser")]
    #[case("")]
    fn rejects_unknown_and_wrong_case(#[case] input: &str) {
        assert!(input.parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
        let role: Role = serde_json::from_str("\"author\"").unwrap();
        assert_eq!(role, Role::Author);
    }
}
