//! Amazon DynamoDB engine backend implementation
//!
//! This module provides a DynamoDB engine backend with support for:
//! - User record CRUD operations (create, update, get, delete)
//! - Partial updates through parameterized update expressions
//! - Typed mapping between records and DynamoDB attribute values
//! - Static credentials and custom endpoints (DynamoDB Local)

#[cfg(feature = "dynamodb")]
use aws_sdk_dynamodb::{
    error::SdkError,
    types::{AttributeValue as DynamoAttributeValue, ReturnValue},
    Client as DynamoDbClient,
};

#[cfg(feature = "dynamodb")]
use aws_config::{BehaviorVersion, Region};

#[cfg(feature = "dynamodb")]
use crate::engine::constants::USERNAME_ATTRIBUTE;
#[cfg(feature = "dynamodb")]
use crate::engine::engine_api::{
    utils, AttributeValue, DatabaseEngine, EngineBackend, UserRecord,
};
use crate::error::{EngineError, EngineResult};
#[cfg(feature = "dynamodb")]
use std::collections::HashMap;

#[cfg(feature = "dynamodb")]
use tracing::debug;

/// DynamoDB engine configuration
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDB table name
    pub table_name: String,
    /// AWS region
    pub region: String,
    /// AWS access key ID (optional, can use IAM roles)
    pub access_key_id: Option<String>,
    /// AWS secret access key (optional, can use IAM roles)
    pub secret_access_key: Option<String>,
    /// DynamoDB endpoint URL (for DynamoDB-compatible services)
    pub endpoint_url: Option<String>,
}

impl Default for DynamoDbConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
        }
    }
}

/// DynamoDB engine backend
#[cfg(feature = "dynamodb")]
pub struct DynamoDbEngine {
    client: DynamoDbClient,
    config: DynamoDbConfig,
}

#[cfg(feature = "dynamodb")]
impl DynamoDbEngine {
    /// Create a new DynamoDB engine backend
    pub async fn new(config: DynamoDbConfig) -> EngineResult<Self> {
        let aws_config = Self::build_aws_config(&config).await?;
        let client = DynamoDbClient::new(&aws_config);

        // Verify table access
        Self::verify_table_access(&client, &config.table_name).await?;

        Ok(Self { client, config })
    }

    /// Build AWS configuration
    async fn build_aws_config(config: &DynamoDbConfig) -> EngineResult<aws_config::SdkConfig> {
        let mut builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // Set credentials if provided
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder.credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "user-store-engine",
            ));
        }

        // Set custom endpoint if provided
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(builder.load().await)
    }

    /// Verify table access
    async fn verify_table_access(client: &DynamoDbClient, table_name: &str) -> EngineResult<()> {
        match client.describe_table().table_name(table_name).send().await {
            Ok(_) => Ok(()),
            Err(e) => Err(EngineError::ConnectionError {
                reason: format!("Cannot access DynamoDB table '{}': {}", table_name, e),
            }),
        }
    }

    /// Convert a record value to a DynamoDB attribute value
    fn to_attribute_value(value: &AttributeValue) -> DynamoAttributeValue {
        match value {
            AttributeValue::Text(s) => DynamoAttributeValue::S(s.clone()),
            AttributeValue::Number(n) => DynamoAttributeValue::N(n.to_string()),
            AttributeValue::Bool(b) => DynamoAttributeValue::Bool(*b),
        }
    }

    /// Convert a DynamoDB attribute value back to a record value
    fn from_attribute_value(
        name: &str,
        value: DynamoAttributeValue,
    ) -> EngineResult<AttributeValue> {
        match value {
            DynamoAttributeValue::S(s) => Ok(AttributeValue::Text(s)),
            DynamoAttributeValue::N(n) => {
                n.parse::<f64>()
                    .map(AttributeValue::Number)
                    .map_err(|e| EngineError::OperationFailed {
                        operation: "decode_item".to_string(),
                        reason: format!("Invalid number for attribute '{}': {}", name, e),
                    })
            }
            DynamoAttributeValue::Bool(b) => Ok(AttributeValue::Bool(b)),
            _ => Err(EngineError::OperationFailed {
                operation: "decode_item".to_string(),
                reason: format!("Unsupported attribute kind for '{}'", name),
            }),
        }
    }

    /// Convert a record to a DynamoDB item
    fn to_item(record: &UserRecord) -> HashMap<String, DynamoAttributeValue> {
        record
            .iter()
            .map(|(name, value)| (name.clone(), Self::to_attribute_value(value)))
            .collect()
    }

    /// Convert a DynamoDB item to a record
    fn from_item(item: HashMap<String, DynamoAttributeValue>) -> EngineResult<UserRecord> {
        item.into_iter()
            .map(|(name, value)| -> EngineResult<(String, AttributeValue)> {
                let converted = Self::from_attribute_value(&name, value)?;
                Ok((name, converted))
            })
            .collect()
    }

    /// Build the partial-update expression for the supplied attributes
    ///
    /// Attribute names are parameterized as `#name` / `:name` so reserved
    /// words cannot collide with the expression grammar. Names are sorted
    /// to keep the request deterministic.
    fn build_update_expression(
        attributes: &UserRecord,
    ) -> (
        String,
        HashMap<String, String>,
        HashMap<String, DynamoAttributeValue>,
    ) {
        let mut names: Vec<&String> = attributes.keys().collect();
        names.sort();

        let update_expression_pairs: Vec<String> = names
            .iter()
            .map(|name| format!("#{} = :{}", name, name))
            .collect();
        let update_expression = format!("SET {}", update_expression_pairs.join(", "));

        let expression_attribute_names = names
            .iter()
            .map(|name| (format!("#{}", name), (*name).clone()))
            .collect();
        let expression_attribute_values = attributes
            .iter()
            .map(|(name, value)| (format!(":{}", name), Self::to_attribute_value(value)))
            .collect();

        (
            update_expression,
            expression_attribute_names,
            expression_attribute_values,
        )
    }

    fn username_key(username: &str) -> DynamoAttributeValue {
        DynamoAttributeValue::S(username.to_string())
    }
}

#[cfg(feature = "dynamodb")]
impl DatabaseEngine for DynamoDbEngine {
    async fn create_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        utils::validate_username(username)?;

        let record = utils::merged_record(username, attributes);
        debug!(table = %self.config.table_name, username, "put_item");

        self.client
            .put_item()
            .table_name(&self.config.table_name)
            .set_item(Some(Self::to_item(&record)))
            .send()
            .await
            .map_err(|e| EngineError::OperationFailed {
                operation: "put_item".to_string(),
                reason: format!("Failed to put item: {}", e),
            })?;

        Ok(record)
    }

    async fn update_user(&self, username: &str, attributes: UserRecord) -> EngineResult<UserRecord> {
        utils::validate_username(username)?;

        if attributes.is_empty() {
            return Err(EngineError::OperationFailed {
                operation: "update_user".to_string(),
                reason: "No attributes supplied for update".to_string(),
            });
        }

        let (update_expression, mut expression_attribute_names, expression_attribute_values) =
            Self::build_update_expression(&attributes);
        expression_attribute_names.insert(
            format!("#{}", USERNAME_ATTRIBUTE),
            USERNAME_ATTRIBUTE.to_string(),
        );

        debug!(table = %self.config.table_name, username, expression = %update_expression, "update_item");

        let response = self
            .client
            .update_item()
            .table_name(&self.config.table_name)
            .key(USERNAME_ATTRIBUTE, Self::username_key(username))
            .update_expression(update_expression)
            .condition_expression(format!("attribute_exists(#{})", USERNAME_ATTRIBUTE))
            .set_expression_attribute_names(Some(expression_attribute_names))
            .set_expression_attribute_values(Some(expression_attribute_values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(ref service_err)
                    if service_err.err().is_conditional_check_failed_exception() =>
                {
                    EngineError::UserNotFound {
                        username: username.to_string(),
                    }
                }
                _ => EngineError::OperationFailed {
                    operation: "update_item".to_string(),
                    reason: format!("Failed to update item: {}", e),
                },
            })?;

        let item = response
            .attributes
            .ok_or_else(|| EngineError::OperationFailed {
                operation: "update_item".to_string(),
                reason: "No attributes returned for updated item".to_string(),
            })?;

        Self::from_item(item)
    }

    async fn get_user(&self, username: &str) -> EngineResult<Option<UserRecord>> {
        utils::validate_username(username)?;

        debug!(table = %self.config.table_name, username, "get_item");

        let response = self
            .client
            .get_item()
            .table_name(&self.config.table_name)
            .key(USERNAME_ATTRIBUTE, Self::username_key(username))
            .send()
            .await
            .map_err(|e| EngineError::OperationFailed {
                operation: "get_item".to_string(),
                reason: format!("Failed to get item: {}", e),
            })?;

        match response.item {
            Some(item) => Ok(Some(Self::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn delete_user(&self, username: &str) -> EngineResult<()> {
        utils::validate_username(username)?;

        debug!(table = %self.config.table_name, username, "delete_item");

        self.client
            .delete_item()
            .table_name(&self.config.table_name)
            .key(USERNAME_ATTRIBUTE, Self::username_key(username))
            .send()
            .await
            .map_err(|e| EngineError::OperationFailed {
                operation: "delete_item".to_string(),
                reason: format!("Failed to delete item: {}", e),
            })?;

        Ok(())
    }

    fn backend_type(&self) -> EngineBackend {
        EngineBackend::DynamoDb
    }

    fn table_name(&self) -> &str {
        &self.config.table_name
    }
}

/// Stub implementation for when the DynamoDB feature is not enabled
#[cfg(not(feature = "dynamodb"))]
pub struct DynamoDbEngine;

#[cfg(not(feature = "dynamodb"))]
impl DynamoDbEngine {
    /// Always fails; enable the `dynamodb` feature for the real backend
    pub fn new(_config: DynamoDbConfig) -> EngineResult<Self> {
        Err(EngineError::BackendNotAvailable {
            backend: "DynamoDB".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamodb_config_default() {
        let config = DynamoDbConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.table_name.is_empty());
        assert!(config.access_key_id.is_none());
        assert!(config.endpoint_url.is_none());
    }

    #[cfg(feature = "dynamodb")]
    #[test]
    fn test_item_conversion_round_trip() {
        let mut record = UserRecord::new();
        record.insert("username".to_string(), AttributeValue::from("alice"));
        record.insert("email".to_string(), AttributeValue::from("a@x.com"));
        record.insert("age".to_string(), AttributeValue::from(30i64));
        record.insert("active".to_string(), AttributeValue::from(true));

        let item = DynamoDbEngine::to_item(&record);
        assert_eq!(
            item.get("age"),
            Some(&DynamoAttributeValue::N("30".to_string()))
        );

        let decoded = DynamoDbEngine::from_item(item).unwrap();
        assert_eq!(decoded, record);
    }

    #[cfg(feature = "dynamodb")]
    #[test]
    fn test_from_item_rejects_unsupported_kind() {
        let mut item = HashMap::new();
        item.insert(
            "tags".to_string(),
            DynamoAttributeValue::Ss(vec!["a".to_string()]),
        );

        let result = DynamoDbEngine::from_item(item);
        assert!(matches!(result, Err(EngineError::OperationFailed { .. })));
    }

    #[cfg(feature = "dynamodb")]
    #[test]
    fn test_build_update_expression() {
        let mut attributes = UserRecord::new();
        attributes.insert("email".to_string(), AttributeValue::from("b@x.com"));
        attributes.insert("age".to_string(), AttributeValue::from(31i64));

        let (expression, names, values) = DynamoDbEngine::build_update_expression(&attributes);

        assert_eq!(expression, "SET #age = :age, #email = :email");
        assert_eq!(names.get("#email"), Some(&"email".to_string()));
        assert_eq!(names.get("#age"), Some(&"age".to_string()));
        assert_eq!(
            values.get(":email"),
            Some(&DynamoAttributeValue::S("b@x.com".to_string()))
        );
        assert_eq!(
            values.get(":age"),
            Some(&DynamoAttributeValue::N("31".to_string()))
        );
    }

    #[cfg(feature = "dynamodb")]
    #[tokio::test]
    async fn test_engine_creation_without_credentials() {
        let config = DynamoDbConfig {
            table_name: "test-users".to_string(),
            endpoint_url: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        };

        // No DynamoDB endpoint is listening, so table verification fails
        let result = DynamoDbEngine::new(config).await;
        assert!(result.is_err());
    }
}
