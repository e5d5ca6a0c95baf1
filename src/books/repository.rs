pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::query::{PageRequest, PredicateSet, SortOrder};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // find a book by its normalized name
    async fn find_by_name(&self, book_name: &str) -> LibraryResult<Option<BookEntity>>;

    // books matching all predicates, sorted by order and windowed by page when given
    async fn query(&self, predicates: &PredicateSet, order: Option<&SortOrder>,
                   page: Option<&PageRequest>) -> LibraryResult<Vec<BookEntity>>;

    // number of books matching all predicates
    async fn count(&self, predicates: &PredicateSet) -> LibraryResult<usize>;
}
