use std::sync::Arc;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(config: &Configuration) -> Arc<dyn BookRepository> {
    let table_name = config.books_table.as_str();
    let index_name = format!("{}_ndx", table_name);
    match config.store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config).await;
            Arc::new(DDBBookRepository::new(client, table_name, index_name.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config).await;
            if let Err(err) = create_table(&client, table_name, "book_id", "book_name", "author").await {
                tracing::debug!(table = table_name, error = %err, "books table not created");
            }
            Arc::new(DDBBookRepository::new(client, table_name, index_name.as_str()))
        }
        RepositoryStore::Memory => {
            Arc::new(MemoryBookRepository::new())
        }
    }
}
