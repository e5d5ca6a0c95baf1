use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::catalog::filter::normalizer::{normalize_date, normalize_text};
use crate::core::command::{Command, CommandError};
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) const INVALID_BOOK: &str = "invalid_book";

pub(crate) struct RegisterBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RegisterBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterBookCommandRequest {
    pub(crate) book_name: String,
    pub(crate) author: String,
    pub(crate) book_type: String,
    pub(crate) price: f64,
    pub(crate) publication_date: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) stock: i64,
    pub(crate) image: String,
}

impl RegisterBookCommandRequest {
    fn required(field: &str, value: &str) -> LibraryResult<String> {
        normalize_text(Some(value)).ok_or_else(|| {
            LibraryError::validation(format!("{} is required", field).as_str(), Some(INVALID_BOOK.to_string()))
        })
    }

    pub fn build_book(&self) -> LibraryResult<BookDto> {
        let book_name = Self::required("book_name", self.book_name.as_str())?;
        let author = Self::required("author", self.author.as_str())?;
        let book_type = Self::required("book_type", self.book_type.as_str())?;
        let publication_date = normalize_date("publication_date", Some(self.publication_date.as_str()))?
            .ok_or_else(|| LibraryError::validation("publication_date is required", Some(INVALID_BOOK.to_string())))?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(LibraryError::validation("price must not be negative", Some(INVALID_BOOK.to_string())));
        }
        if self.stock < 0 {
            return Err(LibraryError::validation("stock must not be negative", Some(INVALID_BOOK.to_string())));
        }
        let description = self.description.as_deref().map(str::trim).filter(|d| !d.is_empty());
        Ok(BookDto::new(book_name.as_str(), author.as_str(), book_type.as_str(), self.price,
                        publication_date, description, self.stock, self.image.trim()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBookCommandResponse {
    pub book_id: String,
    pub detail: String,
}

impl RegisterBookCommandResponse {
    pub fn new(book: &BookDto) -> Self {
        Self {
            book_id: book.book_id.to_string(),
            detail: "Book registered successfully".to_string(),
        }
    }
}

#[async_trait]
impl Command<RegisterBookCommandRequest, RegisterBookCommandResponse> for RegisterBookCommand {
    async fn execute(&self, req: RegisterBookCommandRequest) -> Result<RegisterBookCommandResponse, CommandError> {
        let book = req.build_book()?;
        self.catalog_service.register_book(&book).await
            .map_err(CommandError::from)
            .map(|saved| RegisterBookCommandResponse::new(&saved))
    }
}
