//! DynamoDB-backed record store.

use async_trait::async_trait;
use aws_sdk_dynamodb::config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::{Client, Config};
use tracing::{debug, instrument};

use catalog_core::Result;
use catalog_core::error::StoreError;
use catalog_core::expr::{Condition, ExpressionAttributes, Update};
use catalog_core::repo::{Item, TableSchema};
use catalog_core::traits::{Conditional, RecordStore, ScanOutput, ScanRequest};

use crate::convert::{item_from_aws, item_to_aws, names_param, values_param};
use crate::settings::AwsSettings;

/// Record store backed by DynamoDB tables.
///
/// Conditions and updates are rendered into expression strings with
/// placeholder maps; a `ConditionalCheckFailedException` is reported as
/// [`Conditional::ConditionFailed`].
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from region, endpoint and credential settings.
    pub fn from_settings(settings: &AwsSettings) -> Self {
        let mut builder = Config::builder().region(Region::new(settings.region.clone()));

        if let Some((access, secret, token)) = settings.static_credentials() {
            builder =
                builder.credentials_provider(Credentials::new(access, secret, token, None, "catalog"));
        }
        if let Some(timeout) = settings.operation_timeout {
            builder = builder.timeout_config(
                TimeoutConfig::builder().operation_timeout(timeout).build(),
            );
        }
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let timed_out = matches!(err, SdkError::TimeoutError(_));
    let dispatch = matches!(err, SdkError::DispatchFailure(_));
    let message = DisplayErrorContext(err).to_string();

    if timed_out {
        StoreError::Timeout
    } else if dispatch {
        StoreError::Connection { message }
    } else {
        StoreError::Service { message }
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    #[instrument(skip(self, request), fields(table = %table.name, limit = request.limit))]
    async fn scan(&self, table: &TableSchema, request: ScanRequest) -> Result<ScanOutput> {
        let mut attrs = ExpressionAttributes::new();
        let limit = i32::try_from(request.limit).unwrap_or(i32::MAX);

        let mut scan = self.client.scan().table_name(&table.name).limit(limit);

        if let Some(filter) = &request.filter {
            scan = scan.filter_expression(filter.render(&mut attrs));
        }
        if !request.projection.is_empty() {
            scan = scan.projection_expression(attrs.projection(&request.projection));
        }
        if let Some(start) = &request.exclusive_start_key {
            scan = scan.set_exclusive_start_key(Some(item_to_aws(start)));
        }

        let (names, values) = attrs.into_parts();
        let output = scan
            .set_expression_attribute_names(names_param(names))
            .set_expression_attribute_values(values_param(values))
            .send()
            .await
            .map_err(store_error)?;

        let items: Vec<Item> = output.items().iter().map(item_from_aws).collect();
        let last_evaluated_key = output
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .map(item_from_aws);

        debug!(
            returned = items.len(),
            more = last_evaluated_key.is_some(),
            "Scanned table"
        );

        Ok(ScanOutput {
            items,
            last_evaluated_key,
        })
    }

    #[instrument(skip(self), fields(table = %table.name))]
    async fn item_count(&self, table: &TableSchema) -> Result<u64> {
        let output = self
            .client
            .describe_table()
            .table_name(&table.name)
            .send()
            .await
            .map_err(store_error)?;

        // DescribeTable refreshes this figure roughly every six hours.
        let count = output
            .table()
            .and_then(|t| t.item_count())
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);

        debug!(count, "Described table");
        Ok(count)
    }

    #[instrument(skip(self, key, projection), fields(table = %table.name))]
    async fn get_item(
        &self,
        table: &TableSchema,
        key: &Item,
        projection: &[String],
    ) -> Result<Option<Item>> {
        let mut attrs = ExpressionAttributes::new();
        let mut get = self
            .client
            .get_item()
            .table_name(&table.name)
            .set_key(Some(item_to_aws(&table.key_of(key)?)))
            .consistent_read(true);

        if !projection.is_empty() {
            get = get.projection_expression(attrs.projection(projection));
        }

        let (names, _) = attrs.into_parts();
        let output = get
            .set_expression_attribute_names(names_param(names))
            .send()
            .await
            .map_err(store_error)?;

        let item = output.item().map(item_from_aws);
        debug!(found = item.is_some(), "Fetched item");
        Ok(item)
    }

    #[instrument(skip(self, item, condition), fields(table = %table.name))]
    async fn put_item(
        &self,
        table: &TableSchema,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<Conditional<()>> {
        table.key_of(&item)?;

        let mut attrs = ExpressionAttributes::new();
        let mut put = self
            .client
            .put_item()
            .table_name(&table.name)
            .set_item(Some(item_to_aws(&item)));

        if let Some(condition) = condition {
            put = put.condition_expression(condition.render(&mut attrs));
        }

        let (names, values) = attrs.into_parts();
        let result = put
            .set_expression_attribute_names(names_param(names))
            .set_expression_attribute_values(values_param(values))
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!("Put item");
                Ok(Conditional::Applied(()))
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                debug!("Put condition failed");
                Ok(Conditional::ConditionFailed)
            }
            Err(err) => Err(store_error(err).into()),
        }
    }

    #[instrument(skip(self, key, update, condition), fields(table = %table.name))]
    async fn update_item(
        &self,
        table: &TableSchema,
        key: &Item,
        update: &Update,
        condition: Option<&Condition>,
    ) -> Result<Conditional<Item>> {
        let mut attrs = ExpressionAttributes::new();
        let mut request = self
            .client
            .update_item()
            .table_name(&table.name)
            .set_key(Some(item_to_aws(&table.key_of(key)?)))
            .update_expression(update.render(&mut attrs))
            .return_values(ReturnValue::AllNew);

        if let Some(condition) = condition {
            request = request.condition_expression(condition.render(&mut attrs));
        }

        let (names, values) = attrs.into_parts();
        let result = request
            .set_expression_attribute_names(names_param(names))
            .set_expression_attribute_values(values_param(values))
            .send()
            .await;

        match result {
            Ok(output) => {
                let item = output.attributes().map(item_from_aws).ok_or_else(|| {
                    StoreError::UnexpectedResponse {
                        message: "update returned no attributes".to_string(),
                    }
                })?;
                debug!("Updated item");
                Ok(Conditional::Applied(item))
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                debug!("Update condition failed");
                Ok(Conditional::ConditionFailed)
            }
            Err(err) => Err(store_error(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn builds_client_against_local_endpoint() {
        let settings = AwsSettings {
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://localhost:8000".to_string()),
            access_key_id: Some("local".to_string()),
            secret_access_key: Some("local".to_string()),
            session_token: None,
            operation_timeout: Some(Duration::from_secs(3)),
        };

        let store = DynamoStore::from_settings(&settings);
        let config = store.client.config();
        let region = config.region().map(|r| r.to_string());
        assert_eq!(region.as_deref(), Some("us-east-1"));

        let timeout = config.timeout_config().and_then(|t| t.operation_timeout());
        assert_eq!(timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_store_error() {
        let settings = AwsSettings {
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://127.0.0.1:9".to_string()),
            access_key_id: Some("local".to_string()),
            secret_access_key: Some("local".to_string()),
            session_token: None,
            operation_timeout: Some(Duration::from_secs(2)),
        };
        let store = DynamoStore::from_settings(&settings);
        let table = TableSchema::new("tbl_photo", &["imageID"]);

        let err = store
            .scan(
                &table,
                ScanRequest {
                    limit: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, catalog_core::Error::Store(_)));
    }

    #[tokio::test]
    async fn item_count_against_unreachable_endpoint_is_a_store_error() {
        let settings = AwsSettings {
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://127.0.0.1:9".to_string()),
            access_key_id: Some("local".to_string()),
            secret_access_key: Some("local".to_string()),
            operation_timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        let store = DynamoStore::from_settings(&settings);
        let table = TableSchema::new("tbl_photo", &["imageID"]);

        let err = store.item_count(&table).await.unwrap_err();
        assert!(matches!(err, catalog_core::Error::Store(_)));
    }
}
