use std::sync::Arc;
use async_trait::async_trait;
use uuid::Uuid;
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookDto, BookSummaryDto};
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::filter::{self, FilterRequest};
use crate::core::domain::{Configuration, Identifiable};
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

pub(crate) const INVALID_BOOK_ID: &str = "invalid_book_id";

pub(crate) struct CatalogServiceImpl {
    book_repository: Arc<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Arc<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn register_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        if self.book_repository.find_by_name(book.name()).await?.is_some() {
            tracing::warn!(book_name = book.name(), "rejected duplicate book");
            return Err(LibraryError::duplicate_key(
                format!("Book with name '{}' already exists", book.name()).as_str()));
        }
        let entity = BookEntity::from(book);
        let _ = self.book_repository.create(&entity).await?;
        tracing::info!(book_id = entity.id().as_str(), book_name = entity.name(), in_stock = entity.in_stock(), "registered book");
        Ok(BookDto::from(&entity))
    }

    async fn filter_books(&self, request: &FilterRequest) -> LibraryResult<PaginatedResult<BookSummaryDto>> {
        filter::filter_books(self.book_repository.as_ref(), request).await
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        let id = Uuid::parse_str(id.trim()).map_err(|_| {
            LibraryError::validation(format!("invalid book id {}", id).as_str(), Some(INVALID_BOOK_ID.to_string()))
        })?;
        self.book_repository.get(id.to_string().as_str()).await.map(|b| BookDto::from(&b))
    }
}
