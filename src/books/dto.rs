use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::books::domain::model::{BookEntity, BookMetadata};
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub book_id: String,
    pub book_name: String,
    pub author: String,
    pub book_type: String,
    pub price: f64,
    #[serde(with = "serializer")]
    pub publication_date: NaiveDateTime,
    pub description: Option<String>,
    pub stock: i64,
    pub image: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl BookDto {
    #[allow(clippy::too_many_arguments)]
    pub fn new(book_name: &str, author: &str, book_type: &str, price: f64,
               publication_date: NaiveDateTime, description: Option<&str>,
               stock: i64, image: &str) -> BookDto {
        BookDto {
            book_id: Uuid::new_v4().to_string(),
            book_name: book_name.to_string(),
            author: author.to_string(),
            book_type: book_type.to_string(),
            price,
            publication_date,
            description: description.map(str::to_string),
            stock,
            image: image.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.book_id.to_string()
    }
}

impl Book for BookDto {
    fn name(&self) -> &str {
        self.book_name.as_str()
    }

    fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// Public shape of a book in filter results. The identifier and metadata blob never leave
// the service through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookSummaryDto {
    pub book_name: String,
    pub author: String,
    pub book_type: String,
    pub price: f64,
    #[serde(with = "serializer")]
    pub publication_date: NaiveDateTime,
    pub description: Option<String>,
    pub stock: i64,
    pub image: String,
}

impl From<&BookEntity> for BookSummaryDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_name: other.book_name.to_string(),
            author: other.author.to_string(),
            book_type: other.book_type.to_string(),
            price: other.price,
            publication_date: other.publication_date,
            description: other.description.clone(),
            stock: other.stock,
            image: other.image.to_string(),
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            book_name: other.book_name.to_string(),
            author: other.author.to_string(),
            book_type: other.book_type.to_string(),
            price: other.price,
            publication_date: other.publication_date,
            description: other.description.clone(),
            stock: other.stock,
            image: other.image.to_string(),
            created_at: other.created_at,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        let mut entity = Self {
            book_id: other.book_id.to_string(),
            book_name: other.book_name.to_string(),
            author: other.author.to_string(),
            book_type: other.book_type.to_string(),
            price: other.price,
            publication_date: other.publication_date,
            description: other.description.clone(),
            stock: other.stock,
            image: other.image.to_string(),
            book_metadata: BookMetadata::default(),
            created_at: other.created_at,
        };
        entity.book_metadata = BookMetadata::snapshot(&entity);
        entity
    }
}
