use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::utils::date::format_date;

pub(crate) async fn create_table(client: &Client,
                                 table_name: &str, pk: &str,
                                 gsi_pk: &str, gsi_sk: &str) -> LibraryResult<()> {
    let gsi = GlobalSecondaryIndex::builder()
        .index_name(format!("{}_ndx", table_name))
        .key_schema(KeySchemaElement::builder()
            .attribute_name(gsi_pk)
            .key_type(KeyType::Hash).build())
        .key_schema(KeySchemaElement::builder()
            .attribute_name(gsi_sk)
            .key_type(KeyType::Range).build())
        .projection(Projection::builder().projection_type(ProjectionType::All).build())
        .provisioned_throughput(
            ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build())
        .build();

    match client
        .create_table()
        .table_name(table_name)
        .global_secondary_indexes(gsi)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(pk)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(gsi_pk)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(gsi_sk)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        )
        .send()
        .await
    {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to create {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to describe {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

// inverse of parse_item, decodes a stored item through its serde representation
pub(crate) fn parse_entity<T: DeserializeOwned>(map: &HashMap<String, AttributeValue>) -> LibraryResult<T> {
    let value = Value::Object(map.iter().map(|(k, v)| (k.clone(), item_to_value(v))).collect());
    serde_json::from_value(value).map_err(LibraryError::from)
}

pub(crate) fn string_date(date: NaiveDateTime) -> AttributeValue {
    AttributeValue::S(format_date(&date))
}

pub(crate) fn number_attribute(n: f64) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

// Appends `#name op :value` to the filter expression and returns the value placeholder.
// The index keeps placeholders unique when one attribute carries several conditions.
pub(crate) fn add_filter_expr(attribute: &str, op: &str, index: usize, filter_expr: &mut String) -> String {
    let placeholder = format!(":{}_{}", attribute, index);
    if filter_expr.is_empty() {
        filter_expr.push_str(format!("#{} {} {}", attribute, op, placeholder).as_str());
    } else {
        filter_expr.push_str(format!(" AND #{} {} {}", attribute, op, placeholder).as_str());
    }
    placeholder
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => {
            AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect())
        }
    }
}

fn item_to_value(item: &AttributeValue) -> Value {
    match item {
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::Number(Number::from(i))
            } else {
                n.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(l) => Value::Array(l.iter().map(item_to_value).collect()),
        AttributeValue::M(m) => {
            Value::Object(m.iter().map(|(k, v)| (k.clone(), item_to_value(v))).collect())
        }
        _ => Value::Null,
    }
}

// helper method to build db-client for the configured store
pub(crate) async fn build_db_client(config: &Configuration) -> Client {
    match config.store {
        RepositoryStore::DynamoDB => {
            //Get config from environment.
            let aws_config = aws_config::load_from_env().await;
            //Create the DynamoDB client.
            Client::new(&aws_config)
        }
        RepositoryStore::LocalDynamoDB | RepositoryStore::Memory => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(config.dynamodb_endpoint.as_str())
                .build();
            Client::from_conf(dynamodb_local_config)
        }
    }
}

impl From<SdkError<PutItemError>> for LibraryError {
    fn from(err: SdkError<PutItemError>) -> Self {
        if let SdkError::ServiceError(ctx) = &err {
            if ctx.err().is_conditional_check_failed_exception() {
                return LibraryError::duplicate_key(format!("{:?}", err).as_str());
            }
        }
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<QueryError>> for LibraryError {
    fn from(err: SdkError<QueryError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<ScanError>> for LibraryError {
    fn from(err: SdkError<ScanError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            (ctx.raw().http().status().is_server_error() || has_exceeded_limit(ctx.raw().http().body().bytes()), Some(ctx.raw().http().status().to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

fn has_exceeded_limit(opts: Option<&[u8]>) -> bool {
    // "ProvisionedThroughputExceeded", "RequestLimitExceeded", ...
    opts.map(|b| b.windows(6).any(|w| w == b"ceeded")).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::types::AttributeValue;
    use serde::Deserialize;
    use serde_json::json;
    use crate::utils::ddb::{add_filter_expr, has_exceeded_limit, parse_entity, parse_item};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        name: String,
        price: f64,
        stock: i64,
        note: Option<String>,
        nested: HashMap<String, i64>,
    }

    #[tokio::test]
    async fn test_should_round_trip_items() {
        let item = parse_item(json!({
            "name": "dune",
            "price": 9.5,
            "stock": 3,
            "note": null,
            "nested": {"rating": 0}
        })).expect("should parse item");
        assert_eq!(Some(&AttributeValue::N("9.5".to_string())), item.get("price"));
        assert_eq!(Some(&AttributeValue::Null(true)), item.get("note"));

        let sample: Sample = parse_entity(&item).expect("should parse entity");
        assert_eq!(Sample {
            name: "dune".to_string(),
            price: 9.5,
            stock: 3,
            note: None,
            nested: HashMap::from([("rating".to_string(), 0)]),
        }, sample);
    }

    #[tokio::test]
    async fn test_should_build_filter_expr() {
        let mut expr = String::new();
        assert_eq!(":author_0", add_filter_expr("author", "=", 0, &mut expr).as_str());
        assert_eq!(":publication_date_1", add_filter_expr("publication_date", ">=", 1, &mut expr).as_str());
        assert_eq!(":publication_date_2", add_filter_expr("publication_date", "<=", 2, &mut expr).as_str());
        assert_eq!("#author = :author_0 AND #publication_date >= :publication_date_1 AND #publication_date <= :publication_date_2", expr.as_str());
    }

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(b"ProvisionedThroughputExceededException")));
        assert!(!has_exceeded_limit(Some(b"short")));
        assert!(!has_exceeded_limit(None));
    }
}
