//! # user-store
//!
//! A minimal abstraction layer for user-record CRUD operations against a
//! managed key-value store, with pluggable backends.
//!
//! ## Features
//!
//! - **Engine Module**: Trait-based user-record engine with create, update,
//!   get and delete operations
//! - **DynamoDB Backend**: Adapter translating the engine contract into
//!   Amazon DynamoDB requests
//! - **Memory Backend**: In-memory engine for tests and embedding
//!
//! ## Optional Features
//!
//! - `async`: Asynchronous operations support
//! - `dynamodb`: Amazon DynamoDB engine backend
//! - `serde_support`: Serde serialization support for record values
//!
//! ## Example
//!
//! ```rust
//! use user_store::engine::{DatabaseEngineSync, MemoryEngine, UserRecord};
//!
//! let engine = MemoryEngine::new("users");
//!
//! let mut attributes = UserRecord::new();
//! attributes.insert("email".to_string(), "a@x.com".into());
//!
//! let record = engine.create_user("alice", attributes)?;
//! assert!(record.contains_key("username"));
//! # Ok::<(), user_store::error::EngineError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod engine;
pub mod error;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    #[cfg(feature = "async")]
    pub use crate::engine::DatabaseEngine;
    #[cfg(feature = "dynamodb")]
    pub use crate::engine::DynamoDbEngine;
    pub use crate::engine::{
        AttributeValue, DatabaseEngineSync, DynamoDbConfig, EngineBackend, MemoryEngine,
        UserRecord,
    };
    pub use crate::error::{EngineError, EngineResult, Error, Result};
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(CRATE_NAME, "user-store");
    }
}
