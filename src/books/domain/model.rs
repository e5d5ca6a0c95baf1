use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookEntity is the persisted catalog record. Names are stored trimmed and lower-cased and
// are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
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
    pub book_metadata: BookMetadata,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

// Snapshot of the book taken at registration plus the review counters. It is not kept in
// sync with the top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookMetadata {
    pub book_name: String,
    pub author: String,
    pub book_type: String,
    pub price: f64,
    #[serde(with = "serializer")]
    pub publication_date: NaiveDateTime,
    pub description: Option<String>,
    pub stock: i64,
    pub image: String,
    pub rating: i64,
    pub total_reviews: i64,
}

impl BookEntity {
    #[allow(clippy::too_many_arguments)]
    pub fn new(book_name: &str, author: &str, book_type: &str, price: f64,
               publication_date: NaiveDateTime, description: Option<&str>,
               stock: i64, image: &str) -> Self {
        let mut entity = Self {
            book_id: Uuid::new_v4().to_string(),
            book_name: book_name.to_string(),
            author: author.to_string(),
            book_type: book_type.to_string(),
            price,
            publication_date,
            description: description.map(str::to_string),
            stock,
            image: image.to_string(),
            book_metadata: BookMetadata::default(),
            created_at: Utc::now().naive_utc(),
        };
        entity.book_metadata = BookMetadata::snapshot(&entity);
        entity
    }
}

impl BookMetadata {
    pub fn snapshot(book: &BookEntity) -> Self {
        Self {
            book_name: book.book_name.to_string(),
            author: book.author.to_string(),
            book_type: book.book_type.to_string(),
            price: book.price,
            publication_date: book.publication_date,
            description: book.description.clone(),
            stock: book.stock,
            image: book.image.to_string(),
            rating: 0,
            total_reviews: 0,
        }
    }
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            book_name: String::new(),
            author: String::new(),
            book_type: String::new(),
            price: 0.0,
            publication_date: NaiveDateTime::default(),
            description: None,
            stock: 0,
            image: String::new(),
            rating: 0,
            total_reviews: 0,
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }
}

impl Book for BookEntity {
    fn name(&self) -> &str {
        self.book_name.as_str()
    }

    fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::books::domain::Book;
    use crate::books::domain::model::BookEntity;

    #[tokio::test]
    async fn test_should_build_books_with_metadata_snapshot() {
        let published = NaiveDate::from_ymd_opt(2001, 2, 3).and_then(|d| d.and_hms_opt(0, 0, 0)).expect("date");
        let book = BookEntity::new("dune", "frank herbert", "sci-fi", 9.5, published, Some("spice"), 3, "dune.png");
        assert_eq!("dune", book.name());
        assert!(book.in_stock());
        assert_eq!("dune", book.book_metadata.book_name.as_str());
        assert_eq!(published, book.book_metadata.publication_date);
        assert_eq!(Some("spice".to_string()), book.book_metadata.description);
        assert_eq!(0, book.book_metadata.rating);
        assert_eq!(0, book.book_metadata.total_reviews);
    }

    #[tokio::test]
    async fn test_should_serialize_books() {
        let published = NaiveDate::from_ymd_opt(2001, 2, 3).and_then(|d| d.and_hms_opt(4, 5, 6)).expect("date");
        let book = BookEntity::new("dune", "frank herbert", "sci-fi", 9.5, published, None, 0, "dune.png");
        let json = serde_json::to_value(&book).expect("serialize");
        assert_eq!("2001-02-03T04:05:06", json["publication_date"].as_str().expect("date string"));
        assert_eq!(0, json["book_metadata"]["rating"].as_i64().expect("rating"));
        let loaded: BookEntity = serde_json::from_value(json).expect("deserialize");
        assert_eq!(book, loaded);
    }
}
