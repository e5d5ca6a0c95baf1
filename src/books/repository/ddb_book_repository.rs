use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Select};

use crate::books::domain::model::BookEntity;
use crate::books::query::{PageRequest, PredicateSet, PredicateValue, SortOrder};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, number_attribute, parse_entity, parse_item, string_date};

// Scan filter compiled from a predicate set, attribute names go through placeholders so
// reserved words are never an issue.
#[derive(Debug, Default, PartialEq)]
struct DDBFilter {
    expression: Option<String>,
    names: Option<HashMap<String, String>>,
    values: Option<HashMap<String, AttributeValue>>,
}

impl From<&PredicateSet> for DDBFilter {
    fn from(predicates: &PredicateSet) -> Self {
        if predicates.is_empty() {
            return DDBFilter::default();
        }
        let mut expression = String::new();
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        for (i, predicate) in predicates.iter().enumerate() {
            let attribute = predicate.column.attribute();
            let placeholder = add_filter_expr(attribute, predicate.comparison.symbol(), i, &mut expression);
            names.insert(format!("#{}", attribute), attribute.to_string());
            values.insert(placeholder, match &predicate.value {
                PredicateValue::Text(s) => AttributeValue::S(s.to_string()),
                PredicateValue::Number(n) => number_attribute(*n),
                PredicateValue::Date(d) => string_date(*d),
            });
        }
        DDBFilter {
            expression: Some(expression),
            names: Some(names),
            values: Some(values),
        }
    }
}

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    // DynamoDB cannot order a scan, so every matching item is read before sorting.
    async fn scan(&self, predicates: &PredicateSet) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let filter = DDBFilter::from(predicates);
        let mut records = vec![];
        let mut exclusive_start_key = None;
        loop {
            let out = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(false)
                .set_filter_expression(filter.expression.clone())
                .set_expression_attribute_names(filter.names.clone())
                .set_expression_attribute_values(filter.values.clone())
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await.map_err(LibraryError::from)?;
            for item in out.items().unwrap_or_default() {
                records.push(parse_entity::<BookEntity>(item)?);
            }
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let out = self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "book_id = :book_id",
            )
            .expression_attribute_values(
                ":book_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from)?;
        let items = out.items().unwrap_or_default();
        if items.len() > 1 {
            return Err(LibraryError::database(format!("too many books for {}", id).as_str(), None, false));
        }
        match items.first() {
            Some(map) => parse_entity(map),
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
        }
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn find_by_name(&self, book_name: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let out = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(1)
            .consistent_read(false)
            .key_condition_expression("book_name = :book_name")
            .expression_attribute_values(":book_name", AttributeValue::S(book_name.to_string()))
            .send()
            .await.map_err(LibraryError::from)?;
        match out.items().unwrap_or_default().first() {
            Some(map) => parse_entity(map).map(Some),
            None => Ok(None),
        }
    }

    async fn query(&self, predicates: &PredicateSet, order: Option<&SortOrder>,
                   page: Option<&PageRequest>) -> LibraryResult<Vec<BookEntity>> {
        let mut records = self.scan(predicates).await?;
        if let Some(order) = order {
            order.sort(&mut records);
        }
        Ok(match page {
            Some(page) => page.slice(records),
            None => records,
        })
    }

    async fn count(&self, predicates: &PredicateSet) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let filter = DDBFilter::from(predicates);
        let mut total = 0;
        let mut exclusive_start_key = None;
        loop {
            let out = self.client
                .scan()
                .table_name(table_name)
                .select(Select::Count)
                .consistent_read(false)
                .set_filter_expression(filter.expression.clone())
                .set_expression_attribute_names(filter.names.clone())
                .set_expression_attribute_values(filter.values.clone())
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await.map_err(LibraryError::from)?;
            total += out.count().max(0) as usize;
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(total)
    }
}
