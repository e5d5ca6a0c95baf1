use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct BookExistsCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl BookExistsCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct BookExistsCommandRequest {
    pub(crate) book_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookExistsCommandResponse {
    pub detail: String,
}

#[async_trait]
impl Command<BookExistsCommandRequest, BookExistsCommandResponse> for BookExistsCommand {
    async fn execute(&self, req: BookExistsCommandRequest) -> Result<BookExistsCommandResponse, CommandError> {
        self.catalog_service.find_book_by_id(req.book_id.as_str()).await
            .map_err(CommandError::from)
            .map(|_| BookExistsCommandResponse { detail: "Book found".to_string() })
    }
}
