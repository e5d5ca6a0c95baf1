//! Filtering engine behind `POST /catalog/filter_book`.
//!
//! A raw [`FilterRequest`] is normalized (text trimmed and lower-cased, date bounds parsed
//! with their offset dropped, pagination validated), turned into a [`PredicateSet`], and
//! executed twice against the book repository: once for the sorted page and once for the
//! total count. Both executions borrow the same predicate set.
//!
//! [`PredicateSet`]: crate::books::query::PredicateSet

pub mod executor;
pub mod normalizer;
pub mod predicate;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookSummaryDto;
use crate::books::repository::BookRepository;
use crate::catalog::filter::executor::{BookQuery, QueryExecutor};
use crate::core::library::{LibraryResult, PaginatedResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_direction() -> Option<String> {
    Some("asc".to_string())
}

/// Filter request as sent by clients. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FilterRequest {
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub book_type: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub publication_date_start_date: Option<String>,
    #[serde(default)]
    pub publication_date_end_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default = "default_direction")]
    pub asc_or_desc: Option<String>,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            book_name: None,
            author: None,
            book_type: None,
            price: None,
            publication_date_start_date: None,
            publication_date_end_date: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            group_by: None,
            asc_or_desc: default_direction(),
        }
    }
}

impl FilterRequest {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }
}

/// Output of the normalizer. Text is trimmed and lower-cased, dates are naive, absent
/// fields stay `None`. Sort tokens are carried through untouched for the executor.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct NormalizedFilter {
    pub book_name: Option<String>,
    pub author: Option<String>,
    pub book_type: Option<String>,
    pub price: Option<f64>,
    pub published_from: Option<NaiveDateTime>,
    pub published_to: Option<NaiveDateTime>,
    pub page: u32,
    pub limit: u32,
    pub group_by: Option<String>,
    pub asc_or_desc: Option<String>,
}

/// Runs a filter request end to end. Malformed input fails before the repository is touched.
pub(crate) async fn filter_books(repository: &dyn BookRepository,
                                 request: &FilterRequest) -> LibraryResult<PaginatedResult<BookSummaryDto>> {
    let filter = normalizer::normalize(request)?;
    let query = BookQuery::from(&filter);
    QueryExecutor::new(repository).execute(&query).await
}
