use serde::{Deserialize, Serialize};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
}

pub const DEFAULT_DYNAMODB_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_BOOKS_TABLE: &str = "books";

// Configuration abstracts config options for the catalog service. It is built once at
// startup and handed to the application state, nothing reads the environment afterwards.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub store: RepositoryStore,
    pub dynamodb_endpoint: String,
    pub books_table: String,
    // shared secret expected in the x-internal-action-token header
    pub internal_action_token: Option<String>,
    pub log_level: String,
    pub dev_mode: bool,
}

impl Configuration {
    pub fn new(branch_id: &str, store: RepositoryStore) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            store,
            dynamodb_endpoint: DEFAULT_DYNAMODB_ENDPOINT.to_string(),
            books_table: DEFAULT_BOOKS_TABLE.to_string(),
            internal_action_token: None,
            log_level: "info".to_string(),
            dev_mode: store != RepositoryStore::DynamoDB,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let store = lookup("CATALOG_STORE")
            .map(RepositoryStore::from)
            .unwrap_or(RepositoryStore::DynamoDB);
        let branch = lookup("CATALOG_BRANCH").unwrap_or_else(|| "prod".to_string());
        let mut config = Configuration::new(branch.as_str(), store);
        if let Some(endpoint) = lookup("CATALOG_DYNAMODB_ENDPOINT") {
            config.dynamodb_endpoint = endpoint;
        }
        if let Some(table) = lookup("CATALOG_BOOKS_TABLE") {
            config.books_table = table;
        }
        config.internal_action_token = lookup("CATALOG_INTERNAL_ACTION_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        if let Some(level) = lookup("CATALOG_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(dev) = lookup("CATALOG_DEV_MODE") {
            config.dev_mode = matches!(dev.trim(), "1" | "true" | "yes");
        }
        config
    }

    pub fn with_internal_action_token(mut self, token: &str) -> Self {
        self.internal_action_token = Some(token.to_string());
        self
    }
}
