pub mod service;

use async_trait::async_trait;
use crate::books::dto::{BookDto, BookSummaryDto};
use crate::catalog::filter::FilterRequest;
use crate::core::library::{LibraryResult, PaginatedResult};

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    // Persists an already normalized book, names are unique across the catalog.
    async fn register_book(&self, book: &BookDto) -> LibraryResult<BookDto>;

    async fn filter_books(&self, request: &FilterRequest) -> LibraryResult<PaginatedResult<BookSummaryDto>>;

    // Looks up a book by its UUID, a malformed id is a validation error.
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto>;
}
