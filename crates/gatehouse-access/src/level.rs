//! Access levels.

use crate::error::{AccessError, AccessResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse authorization tier a request path requires.
///
/// Levels are ordered: `Public < Authenticated < Admin`. The numeric ranks
/// (0, 1, 2) are part of the configuration format, so a config file may say
/// either `default_access = "admin"` or `default_access = 2`.
///
/// # Example
///
/// ```
/// use gatehouse_access::AccessLevel;
///
/// assert!(AccessLevel::Public < AccessLevel::Admin);
/// assert_eq!("admin".parse::<AccessLevel>().unwrap(), AccessLevel::Admin);
/// assert!(AccessLevel::from_rank(3).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "LevelRepr")]
#[repr(u8)]
pub enum AccessLevel {
    /// Anyone may access the path.
    Public = 0,
    /// The caller must be signed in.
    #[default]
    Authenticated = 1,
    /// The caller must be signed in and carry the admin role.
    Admin = 2,
}

impl AccessLevel {
    /// Returns all levels in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Public, Self::Authenticated, Self::Admin]
    }

    /// Returns the numeric rank of the level.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Converts a numeric rank into a level.
    ///
    /// Anything outside `0..=2` is rejected.
    pub fn from_rank(rank: i64) -> AccessResult<Self> {
        match rank {
            0 => Ok(Self::Public),
            1 => Ok(Self::Authenticated),
            2 => Ok(Self::Admin),
            other => Err(AccessError::invalid_level(other)),
        }
    }

    /// Returns the lower-case name used in configuration and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
            Self::Admin => "admin",
        }
    }

    /// Returns true if the level needs a signed-in caller.
    #[must_use]
    pub const fn requires_authentication(self) -> bool {
        !matches!(self, Self::Public)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccessLevel {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "authenticated" => Ok(Self::Authenticated),
            "admin" => Ok(Self::Admin),
            _ => trimmed
                .parse::<i64>()
                .map_err(|_| AccessError::invalid_level(trimmed))
                .and_then(Self::from_rank),
        }
    }
}

impl TryFrom<i64> for AccessLevel {
    type Error = AccessError;

    fn try_from(rank: i64) -> Result<Self, Self::Error> {
        Self::from_rank(rank)
    }
}

/// Wire form accepted when deserializing a level.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Rank(i64),
    Name(String),
}

impl TryFrom<LevelRepr> for AccessLevel {
    type Error = AccessError;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Rank(rank) => Self::from_rank(rank),
            LevelRepr::Name(name) => name.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(AccessLevel::Public < AccessLevel::Authenticated);
        assert!(AccessLevel::Authenticated < AccessLevel::Admin);
    }

    #[test]
    fn test_ranks() {
        assert_eq!(AccessLevel::Public.rank(), 0);
        assert_eq!(AccessLevel::Authenticated.rank(), 1);
        assert_eq!(AccessLevel::Admin.rank(), 2);
    }

    #[test]
    fn test_from_rank_bounds() {
        assert_eq!(AccessLevel::from_rank(0).unwrap(), AccessLevel::Public);
        assert_eq!(AccessLevel::from_rank(2).unwrap(), AccessLevel::Admin);
        assert!(AccessLevel::from_rank(-1).is_err());
        assert!(AccessLevel::from_rank(3).is_err());
    }

    #[test]
    fn test_parse_names_and_ranks() {
        assert_eq!("Public".parse::<AccessLevel>().unwrap(), AccessLevel::Public);
        assert_eq!(" admin ".parse::<AccessLevel>().unwrap(), AccessLevel::Admin);
        assert_eq!("1".parse::<AccessLevel>().unwrap(), AccessLevel::Authenticated);
        assert!("superuser".parse::<AccessLevel>().is_err());
        assert!("9".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for level in AccessLevel::all() {
            assert_eq!(level.to_string().parse::<AccessLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_deserialize_from_name_or_rank() {
        let by_name: AccessLevel = serde_json::from_str("\"authenticated\"").unwrap();
        let by_rank: AccessLevel = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, AccessLevel::Authenticated);
        assert_eq!(by_rank, AccessLevel::Admin);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let err = serde_json::from_str::<AccessLevel>("5").unwrap_err();
        assert!(err.to_string().contains("invalid access level '5'"));
    }

    #[test]
    fn test_serialize_as_name() {
        assert_eq!(
            serde_json::to_string(&AccessLevel::Admin).unwrap(),
            "\"admin\""
        );
    }

    #[test]
    fn test_requires_authentication() {
        assert!(!AccessLevel::Public.requires_authentication());
        assert!(AccessLevel::Authenticated.requires_authentication());
        assert!(AccessLevel::Admin.requires_authentication());
    }
}
