//! Strongly-typed identifier value objects.
//!
//! Records are numbered by the database, so identifiers wrap positive
//! integers rather than UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Creates a MemberId, rejecting zero and negative values.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::out_of_range("ref", 1, i64::MAX, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw database identifier.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid_format("ref", "expected a record number"))?;
        Self::new(value)
    }
}

/// Identifier of a membership type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipTypeId(i64);

impl MembershipTypeId {
    /// Creates a MembershipTypeId, rejecting zero and negative values.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::out_of_range("typeid", 1, i64::MAX, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw database identifier.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MembershipTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MembershipTypeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid_format("typeid", "expected a type number"))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_rejects_zero_and_negative() {
        assert!(MemberId::new(0).is_err());
        assert!(MemberId::new(-1).is_err());
        assert!(MemberId::new(1).is_ok());
    }

    #[test]
    fn member_id_parses_and_displays() {
        let id: MemberId = " 42 ".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn member_id_rejects_garbage() {
        let err = "abc".parse::<MemberId>().unwrap_err();
        assert_eq!(err.field(), "ref");
    }

    #[test]
    fn membership_type_id_parses() {
        let id: MembershipTypeId = "3".parse().unwrap();
        assert_eq!(id.as_i64(), 3);
        assert!("-3".parse::<MembershipTypeId>().is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = MemberId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
