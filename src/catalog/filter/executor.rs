use crate::books::dto::BookSummaryDto;
use crate::books::query::{BookColumn, PageRequest, PredicateSet, SortDirection, SortOrder};
use crate::books::repository::BookRepository;
use crate::catalog::filter::NormalizedFilter;
use crate::catalog::filter::predicate::build_predicates;
use crate::core::library::{LibraryResult, PaginatedResult};

/// Fully resolved query: predicates built once, sort resolved through the allow-list,
/// page window computed from the 1-indexed page.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookQuery {
    pub predicates: PredicateSet,
    pub order: SortOrder,
    pub window: PageRequest,
    pub page: u32,
    pub limit: u32,
}

impl From<&NormalizedFilter> for BookQuery {
    fn from(filter: &NormalizedFilter) -> Self {
        let order = SortOrder::new(
            BookColumn::resolve(filter.group_by.as_deref()),
            SortDirection::resolve(filter.asc_or_desc.as_deref()));
        Self {
            predicates: build_predicates(filter),
            order,
            window: PageRequest::from_page(filter.page, filter.limit),
            page: filter.page,
            limit: filter.limit,
        }
    }
}

pub(crate) struct QueryExecutor<'a> {
    repository: &'a dyn BookRepository,
}

impl<'a> QueryExecutor<'a> {
    pub(crate) fn new(repository: &'a dyn BookRepository) -> Self {
        Self {
            repository,
        }
    }

    // The page and the count are two separate reads over the same predicate set; under
    // concurrent writes they may observe different snapshots.
    pub(crate) async fn execute(&self, query: &BookQuery) -> LibraryResult<PaginatedResult<BookSummaryDto>> {
        tracing::debug!(
            predicates = query.predicates.len(),
            order = %query.order,
            offset = query.window.offset,
            limit = query.window.limit,
            "executing book query"
        );
        let books = self.repository.query(&query.predicates, Some(&query.order), Some(&query.window)).await?;
        let total = self.repository.count(&query.predicates).await?;
        Ok(PaginatedResult::new(total, query.page, query.limit, books).map(BookSummaryDto::from))
    }
}
