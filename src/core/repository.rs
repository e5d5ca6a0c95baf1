use async_trait::async_trait;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "local" | "localdynamodb" => RepositoryStore::LocalDynamoDB,
            "memory" => RepositoryStore::Memory,
            _ => RepositoryStore::DynamoDB,
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local"),
            RepositoryStore::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_parse_store() {
        let stores = vec![
            RepositoryStore::DynamoDB,
            RepositoryStore::LocalDynamoDB,
            RepositoryStore::Memory,
        ];
        for store in stores {
            assert_eq!(store, RepositoryStore::from(store.to_string()));
        }
        assert_eq!(RepositoryStore::Memory, RepositoryStore::from(" MEMORY ".to_string()));
        assert_eq!(RepositoryStore::DynamoDB, RepositoryStore::from("unknown".to_string()));
    }
}
