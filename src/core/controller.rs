use std::sync::Arc;
use axum::http::{HeaderMap, StatusCode};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

pub const INTERNAL_ACTION_TOKEN_HEADER: &str = "x-internal-action-token";
pub const INTERNAL_ACTION_TOKEN_PARAM: &str = "x_internal_action_token";

#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
    pub(crate) catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub async fn build(config: Configuration) -> AppState {
        let catalog = factory::create_catalog_service(&config).await;
        AppState {
            config,
            catalog,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

pub(crate) type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

// Compares the internal action token against the configured shared token. The header wins
// over the query parameter. Requests are refused when no token is configured at all.
pub(crate) fn authorize_internal_action(config: &Configuration, headers: &HeaderMap,
                                        query_token: Option<&str>) -> Result<(), ServerError> {
    let supplied = headers.get(INTERNAL_ACTION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(query_token)
        .map(|v| v.replace("Bearer", "").trim().to_string())
        .unwrap_or_default();
    match &config.internal_action_token {
        Some(expected) if !supplied.is_empty() && supplied == *expected => Ok(()),
        _ => {
            tracing::warn!(header = INTERNAL_ACTION_TOKEN_HEADER, "rejected internal action token");
            Err((StatusCode::UNAUTHORIZED, "invalid internal action token".to_string()))
        }
    }
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Access { .. } => StatusCode::UNAUTHORIZED,
            CommandError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::Serialization { .. } => StatusCode::BAD_REQUEST,
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
        };
        (status, err.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use crate::core::command::CommandError;
    use crate::core::controller::{authorize_internal_action, ServerError, INTERNAL_ACTION_TOKEN_HEADER};
    use crate::core::library::LibraryError;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(INTERNAL_ACTION_TOKEN_HEADER, HeaderValue::from_str(token).expect("header"));
        headers
    }

    #[tokio::test]
    async fn test_should_map_command_errors() {
        let err: ServerError = CommandError::Validation { message: "bad".to_string(), reason_code: None }.into();
        assert_eq!(StatusCode::BAD_REQUEST, err.0);
        assert_eq!("bad", err.1.as_str());
        let err: ServerError = CommandError::DuplicateKey { message: "dup".to_string() }.into();
        assert_eq!(StatusCode::CONFLICT, err.0);
        let err: ServerError = CommandError::NotFound { message: "missing".to_string() }.into();
        assert_eq!(StatusCode::NOT_FOUND, err.0);
        let err: ServerError = CommandError::Runtime { message: "down".to_string(), reason_code: None, retryable: true }.into();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.0);
    }

    #[tokio::test]
    async fn test_should_report_rejected_ddb_request_as_server_error() {
        let err = LibraryError::database_or_unavailable("scan failed", Some("400 Bad Request".to_string()), false);
        assert!(matches!(err, LibraryError::Database { retryable: false, .. }));
        let err: ServerError = CommandError::from(err).into();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.0);
    }

    #[tokio::test]
    async fn test_should_authorize_internal_action() {
        let config = Configuration::new("test", RepositoryStore::Memory).with_internal_action_token("secret");
        assert!(authorize_internal_action(&config, &headers("secret"), None).is_ok());
        assert!(authorize_internal_action(&config, &headers("Bearer secret"), None).is_ok());
        assert_eq!(StatusCode::UNAUTHORIZED, authorize_internal_action(&config, &headers("other"), None).unwrap_err().0);
        assert!(authorize_internal_action(&config, &HeaderMap::new(), None).is_err());
    }

    #[tokio::test]
    async fn test_should_authorize_internal_action_from_query() {
        let config = Configuration::new("test", RepositoryStore::Memory).with_internal_action_token("secret");
        assert!(authorize_internal_action(&config, &HeaderMap::new(), Some("secret")).is_ok());
        assert!(authorize_internal_action(&config, &HeaderMap::new(), Some("Bearer secret")).is_ok());
        assert!(authorize_internal_action(&config, &HeaderMap::new(), Some("other")).is_err());
        assert!(authorize_internal_action(&config, &headers("other"), Some("secret")).is_err());
    }

    #[tokio::test]
    async fn test_should_refuse_internal_action_without_configured_token() {
        let config = Configuration::new("test", RepositoryStore::Memory);
        assert!(authorize_internal_action(&config, &headers(""), None).is_err());
        assert!(authorize_internal_action(&config, &headers("anything"), None).is_err());
        assert!(authorize_internal_action(&config, &HeaderMap::new(), Some("anything")).is_err());
    }
}
