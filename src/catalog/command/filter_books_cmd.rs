use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookSummaryDto;
use crate::catalog::domain::CatalogService;
use crate::catalog::filter::FilterRequest;
use crate::core::command::{Command, CommandError};
use crate::core::library::PaginatedResult;

pub(crate) struct FilterBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl FilterBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

pub(crate) type FilterBooksCommandRequest = FilterRequest;

#[derive(Debug, Serialize)]
pub(crate) struct FilterBooksCommandResponse {
    pub total_books: usize,
    pub page: u32,
    pub limit: u32,
    pub books: Vec<BookSummaryDto>,
}

impl From<PaginatedResult<BookSummaryDto>> for FilterBooksCommandResponse {
    fn from(res: PaginatedResult<BookSummaryDto>) -> Self {
        Self {
            total_books: res.total,
            page: res.page,
            limit: res.limit,
            books: res.records,
        }
    }
}

#[async_trait]
impl Command<FilterBooksCommandRequest, FilterBooksCommandResponse> for FilterBooksCommand {
    async fn execute(&self, req: FilterBooksCommandRequest) -> Result<FilterBooksCommandResponse, CommandError> {
        self.catalog_service.filter_books(&req).await
            .map_err(CommandError::from)
            .map(FilterBooksCommandResponse::from)
    }
}
