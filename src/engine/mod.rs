//! Engine module for user-record persistence
//!
//! This module provides a unified user-record CRUD interface with multiple
//! backend implementations:
//! - **In-memory engine** - For tests and embedding without external services
//! - **Amazon DynamoDB engine** - For managed cloud storage (optional,
//!   requires `dynamodb` feature)
//!
//! The engine module follows a trait-based design allowing for pluggable
//! backends and a consistent API across different stores. Every operation is
//! a single request-response round trip; there is no local caching, retry
//! logic, or state retained between calls.
//!
//! # Examples
//!
//! ## Memory engine
//!
//! ```rust
//! use user_store::engine::{DatabaseEngineSync, MemoryEngine, UserRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = MemoryEngine::new("users");
//!
//! let mut attributes = UserRecord::new();
//! attributes.insert("email".to_string(), "a@x.com".into());
//!
//! let record = engine.create_user("alice", attributes)?;
//! assert_eq!(record.get("email").and_then(|v| v.as_str()), Some("a@x.com"));
//!
//! engine.delete_user("alice")?;
//! assert!(engine.get_user("alice")?.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## DynamoDB engine (requires `dynamodb` feature)
//!
//! ```rust,ignore
//! use user_store::engine::{DatabaseEngine, DynamoDbConfig, DynamoDbEngine, UserRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DynamoDbConfig {
//!         table_name: "users".to_string(),
//!         region: "us-east-1".to_string(),
//!         ..Default::default()
//!     };
//!     let engine = DynamoDbEngine::new(config).await?;
//!
//!     let mut attributes = UserRecord::new();
//!     attributes.insert("email".to_string(), "a@x.com".into());
//!
//!     let record = engine.create_user("alice", attributes).await?;
//!     assert!(record.contains_key("username"));
//!
//!     Ok(())
//! }
//! ```

// Core engine API and types
pub mod engine_api;

// Engine backend implementations
pub mod engine_memory;

pub mod engine_dynamodb;

// Re-export main types for convenience
pub use engine_api::{AttributeValue, DatabaseEngineSync, EngineBackend, UserRecord};

#[cfg(feature = "async")]
pub use engine_api::DatabaseEngine;

pub use engine_memory::MemoryEngine;

pub use engine_dynamodb::DynamoDbConfig;

#[cfg(feature = "dynamodb")]
pub use engine_dynamodb::DynamoDbEngine;

#[cfg(feature = "dynamodb")]
use crate::error::EngineResult;

/// Engine constants
pub mod constants {
    //! Constants used throughout the engine module

    /// Name of the key attribute on every record
    pub const USERNAME_ATTRIBUTE: &str = "username";

    /// Maximum username length in bytes, the DynamoDB partition-key cap
    pub const MAX_USERNAME_LENGTH: usize = 2048;
}

/// Engine factory for creating engine instances
pub struct EngineFactory;

impl EngineFactory {
    /// Create a memory engine instance
    pub fn create_memory(table_name: impl Into<String>) -> MemoryEngine {
        MemoryEngine::new(table_name)
    }

    /// Create a DynamoDB engine instance (requires `dynamodb` feature)
    #[cfg(feature = "dynamodb")]
    pub async fn create_dynamodb(config: DynamoDbConfig) -> EngineResult<DynamoDbEngine> {
        DynamoDbEngine::new(config).await
    }
}
