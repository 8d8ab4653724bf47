//! User-record engine contract with async operations
//!
//! This module defines the record types and the engine traits implemented by
//! every storage backend (DynamoDB, in-memory).

use crate::error::{EngineError, EngineResult};
use std::collections::HashMap;

/// A single attribute value on a user record
///
/// Records are dynamic, so values are restricted to a small closed set of
/// scalar kinds rather than a fixed schema.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde_support", serde(untagged))]
pub enum AttributeValue {
    /// UTF-8 string value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
}

impl AttributeValue {
    /// Returns the value as a string slice if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a number if it is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a boolean if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A stored user record: attribute names mapped to values
///
/// Exactly one attribute, [`constants::USERNAME_ATTRIBUTE`], is the unique
/// key of the record.
///
/// [`constants::USERNAME_ATTRIBUTE`]: crate::engine::constants::USERNAME_ATTRIBUTE
pub type UserRecord = HashMap<String, AttributeValue>;

/// Engine backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineBackend {
    /// Amazon DynamoDB
    DynamoDb,
    /// In-memory storage
    Memory,
}

/// User-record engine trait with async operations
#[cfg(feature = "async")]
pub trait DatabaseEngine: Send + Sync {
    /// Store a new record keyed by username, merged with the given attributes
    ///
    /// An existing record under the same username is silently overwritten.
    /// Returns the stored record.
    fn create_user(
        &self,
        username: &str,
        attributes: UserRecord,
    ) -> impl std::future::Future<Output = EngineResult<UserRecord>> + Send;

    /// Update only the named attributes on an existing record
    ///
    /// Unrelated attributes are preserved. Returns the full post-update
    /// record. Fails with [`EngineError::UserNotFound`] when no record
    /// exists under the username.
    fn update_user(
        &self,
        username: &str,
        attributes: UserRecord,
    ) -> impl std::future::Future<Output = EngineResult<UserRecord>> + Send;

    /// Look up a record by username
    ///
    /// Returns `Ok(None)` when no record exists; absence is not an error.
    fn get_user(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = EngineResult<Option<UserRecord>>> + Send;

    /// Remove the record under the username if present
    ///
    /// Idempotent; deleting a non-existent record succeeds.
    fn delete_user(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = EngineResult<()>> + Send;

    /// Get engine backend type
    fn backend_type(&self) -> EngineBackend;

    /// Get the backing table name
    fn table_name(&self) -> &str;
}

/// Synchronous user-record engine trait for non-async environments
pub trait DatabaseEngineSync: Send + Sync {
    /// Store a new record keyed by username, merged with the given attributes
    fn create_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord>;

    /// Update only the named attributes on an existing record
    fn update_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord>;

    /// Look up a record by username
    fn get_user(&self, username: &str) -> EngineResult<Option<UserRecord>>;

    /// Remove the record under the username if present
    fn delete_user(&self, username: &str) -> EngineResult<()>;

    /// Get engine backend type
    fn backend_type(&self) -> EngineBackend;

    /// Get the backing table name
    fn table_name(&self) -> &str;
}

/// Utility functions for engine implementations
pub mod utils {
    use super::*;
    use crate::engine::constants::{MAX_USERNAME_LENGTH, USERNAME_ATTRIBUTE};

    /// Validate a username key
    pub fn validate_username(username: &str) -> EngineResult<()> {
        if username.is_empty() {
            return Err(EngineError::InvalidUsername {
                reason: "Username cannot be empty".to_string(),
            });
        }

        if username.len() > MAX_USERNAME_LENGTH {
            return Err(EngineError::InvalidUsername {
                reason: format!("Username too long (max {} bytes)", MAX_USERNAME_LENGTH),
            });
        }

        if username.chars().any(char::is_control) {
            return Err(EngineError::InvalidUsername {
                reason: "Username contains control characters".to_string(),
            });
        }

        Ok(())
    }

    /// Build the full record for a create: the username key merged with the
    /// supplied attributes
    ///
    /// Supplied attributes win on collision, so a caller-provided value
    /// under the key attribute name replaces the injected one.
    pub fn merged_record(username: &str, attributes: UserRecord) -> UserRecord {
        let mut record = UserRecord::new();
        record.insert(
            USERNAME_ATTRIBUTE.to_string(),
            AttributeValue::Text(username.to_string()),
        );
        record.extend(attributes);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constants::USERNAME_ATTRIBUTE;

    #[test]
    fn test_validate_username() {
        assert!(utils::validate_username("alice").is_ok());
        assert!(utils::validate_username("").is_err());
        assert!(utils::validate_username("user\nname").is_err());
        assert!(utils::validate_username(&"a".repeat(4096)).is_err());
    }

    #[test]
    fn test_merged_record_contains_key() {
        let mut attributes = UserRecord::new();
        attributes.insert("email".to_string(), AttributeValue::from("a@x.com"));

        let record = utils::merged_record("alice", attributes);
        assert_eq!(
            record.get(USERNAME_ATTRIBUTE),
            Some(&AttributeValue::Text("alice".to_string()))
        );
        assert_eq!(
            record.get("email"),
            Some(&AttributeValue::Text("a@x.com".to_string()))
        );
    }

    #[test]
    fn test_merged_record_attribute_precedence() {
        let mut attributes = UserRecord::new();
        attributes.insert(
            USERNAME_ATTRIBUTE.to_string(),
            AttributeValue::from("mallory"),
        );

        let record = utils::merged_record("alice", attributes);
        assert_eq!(
            record.get(USERNAME_ATTRIBUTE),
            Some(&AttributeValue::Text("mallory".to_string()))
        );
    }

    #[test]
    fn test_attribute_value_accessors() {
        assert_eq!(AttributeValue::from("x").as_str(), Some("x"));
        assert_eq!(AttributeValue::from(42i64).as_number(), Some(42.0));
        assert_eq!(AttributeValue::from(true).as_bool(), Some(true));
        assert_eq!(AttributeValue::from(true).as_str(), None);
    }

    #[cfg(feature = "serde_support")]
    #[test]
    fn test_attribute_value_serde_untagged() {
        let value = AttributeValue::Text("a@x.com".to_string());
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"a@x.com\"");

        let parsed: AttributeValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, AttributeValue::Bool(true));

        let parsed: AttributeValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(parsed, AttributeValue::Number(3.5));
    }
}
