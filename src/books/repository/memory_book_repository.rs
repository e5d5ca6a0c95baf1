use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::books::domain::model::BookEntity;
use crate::books::query::{PageRequest, PredicateSet, SortOrder};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

// In-process book store keyed by book_id. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookRepository {
    books: Arc<RwLock<HashMap<String, BookEntity>>>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        if books.contains_key(&entity.book_id) {
            return Err(LibraryError::duplicate_key(
                format!("book already exists for {}", entity.book_id).as_str()));
        }
        if books.values().any(|b| b.book_name == entity.book_name) {
            return Err(LibraryError::duplicate_key(
                format!("book with name {} already exists", entity.book_name).as_str()));
        }
        books.insert(entity.book_id.to_string(), entity.clone());
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        self.books.read().await.get(id).cloned()
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_name(&self, book_name: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.books.read().await.values().find(|b| b.book_name == book_name).cloned())
    }

    async fn query(&self, predicates: &PredicateSet, order: Option<&SortOrder>,
                   page: Option<&PageRequest>) -> LibraryResult<Vec<BookEntity>> {
        let mut records: Vec<BookEntity> = self.books.read().await.values()
            .filter(|b| predicates.matches(b))
            .cloned()
            .collect();
        if let Some(order) = order {
            order.sort(&mut records);
        }
        Ok(match page {
            Some(page) => page.slice(records),
            None => records,
        })
    }

    async fn count(&self, predicates: &PredicateSet) -> LibraryResult<usize> {
        Ok(self.books.read().await.values().filter(|b| predicates.matches(b)).count())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::books::domain::model::BookEntity;
    use crate::books::query::{BookColumn, PageRequest, Predicate, PredicateSet, PredicateValue, SortDirection, SortOrder};
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;

    fn new_book(name: &str, author: &str) -> BookEntity {
        let published = NaiveDate::from_ymd_opt(2010, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).expect("date");
        BookEntity::new(name, author, "novel", 10.0, published, None, 1, "img")
    }

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new();
        let book = new_book("dune", "herbert");
        let size = books_repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(book, loaded);
        assert!(matches!(books_repo.get("missing").await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_names() {
        let books_repo = MemoryBookRepository::new();
        books_repo.create(&new_book("dune", "herbert")).await.expect("should create book");
        let res = books_repo.create(&new_book("dune", "someone else")).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
        assert_eq!(1, books_repo.count(&PredicateSet::new()).await.expect("count"));
    }

    #[tokio::test]
    async fn test_should_find_by_name() {
        let books_repo = MemoryBookRepository::new();
        let book = new_book("dune", "herbert");
        books_repo.create(&book).await.expect("should create book");
        assert_eq!(Some(book), books_repo.find_by_name("dune").await.expect("find"));
        assert_eq!(None, books_repo.find_by_name("emma").await.expect("find"));
    }

    #[tokio::test]
    async fn test_should_query_and_count_books() {
        let books_repo = MemoryBookRepository::new();
        for i in 0..12 {
            let author = if i % 3 == 0 { "austen" } else { "herbert" };
            books_repo.create(&new_book(format!("title_{:02}", i).as_str(), author)).await.expect("should create book");
        }
        let mut predicates = PredicateSet::new();
        predicates.push(Predicate::equal(BookColumn::Author, PredicateValue::Text("herbert".to_string())));

        let order = SortOrder::new(BookColumn::BookName, SortDirection::Descending);
        let page = PageRequest::from_page(2, 3);
        let res = books_repo.query(&predicates, Some(&order), Some(&page)).await.expect("query");
        let names: Vec<&str> = res.iter().map(|b| b.book_name.as_str()).collect();
        assert_eq!(vec!["title_07", "title_05", "title_04"], names);
        assert_eq!(8, books_repo.count(&predicates).await.expect("count"));
        assert_eq!(8, books_repo.query(&predicates, None, None).await.expect("query").len());
    }

    #[tokio::test]
    async fn test_should_share_books_between_clones() {
        let books_repo = MemoryBookRepository::new();
        let other = books_repo.clone();
        books_repo.create(&new_book("dune", "herbert")).await.expect("should create book");
        assert_eq!(1, other.count(&PredicateSet::new()).await.expect("count"));
    }
}
