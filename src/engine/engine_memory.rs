//! In-memory engine backend
//!
//! Implements the engine contract over a process-local map. Useful for
//! tests and for embedding without an external service.

use crate::engine::constants::USERNAME_ATTRIBUTE;
use crate::engine::engine_api::{
    utils, DatabaseEngineSync, EngineBackend, UserRecord,
};
use crate::error::{EngineError, EngineResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "async")]
use crate::engine::engine_api::DatabaseEngine;

/// In-memory engine backend
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    table_name: String,
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryEngine {
    /// Create a new memory engine bound to a table name
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}

impl DatabaseEngineSync for MemoryEngine {
    fn create_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        utils::validate_username(username)?;

        let record = utils::merged_record(username, attributes);
        // The record is stored under its key attribute, which a caller-supplied
        // attribute may have overridden, same as a full item replace would.
        let key = record
            .get(USERNAME_ATTRIBUTE)
            .and_then(|v| v.as_str())
            .unwrap_or(username)
            .to_string();

        let mut records = self.records.write().unwrap();
        records.insert(key, record.clone());
        Ok(record)
    }

    fn update_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        utils::validate_username(username)?;

        if attributes.is_empty() {
            return Err(EngineError::OperationFailed {
                operation: "update_user".to_string(),
                reason: "No attributes supplied for update".to_string(),
            });
        }

        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(username)
            .ok_or_else(|| EngineError::UserNotFound {
                username: username.to_string(),
            })?;

        for (name, value) in attributes {
            // The key attribute is never modified by an update.
            if name != USERNAME_ATTRIBUTE {
                record.insert(name, value);
            }
        }

        Ok(record.clone())
    }

    fn get_user(&self, username: &str) -> EngineResult<Option<UserRecord>> {
        utils::validate_username(username)?;

        let records = self.records.read().unwrap();
        Ok(records.get(username).cloned())
    }

    fn delete_user(&self, username: &str) -> EngineResult<()> {
        utils::validate_username(username)?;

        let mut records = self.records.write().unwrap();
        records.remove(username);
        Ok(())
    }

    fn backend_type(&self) -> EngineBackend {
        EngineBackend::Memory
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[cfg(feature = "async")]
impl DatabaseEngine for MemoryEngine {
    async fn create_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        DatabaseEngineSync::create_user(self, username, attributes)
    }

    async fn update_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        DatabaseEngineSync::update_user(self, username, attributes)
    }

    async fn get_user(&self, username: &str) -> EngineResult<Option<UserRecord>> {
        DatabaseEngineSync::get_user(self, username)
    }

    async fn delete_user(&self, username: &str) -> EngineResult<()> {
        DatabaseEngineSync::delete_user(self, username)
    }

    fn backend_type(&self) -> EngineBackend {
        EngineBackend::Memory
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}
