use std::collections::HashMap;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use crate::catalog::command::book_exists_cmd::{BookExistsCommand, BookExistsCommandRequest, BookExistsCommandResponse};
use crate::catalog::command::filter_books_cmd::{FilterBooksCommand, FilterBooksCommandRequest, FilterBooksCommandResponse};
use crate::catalog::command::register_book_cmd::{RegisterBookCommand, RegisterBookCommandRequest, RegisterBookCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, authorize_internal_action, json_to_server_error, ServerError, INTERNAL_ACTION_TOKEN_PARAM};
use crate::utils::rate_limit::{rate_limited, RateLimitConfig, BOOK_EXISTS_REQUESTS_PER_MINUTE,
                               FILTER_REQUESTS_PER_MINUTE, REGISTER_REQUESTS_PER_MINUTE};

pub(crate) async fn register_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<(StatusCode, Json<RegisterBookCommandResponse>), ServerError> {
    let req: RegisterBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = RegisterBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub(crate) async fn filter_books(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<FilterBooksCommandResponse>, ServerError> {
    let req: FilterBooksCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = FilterBooksCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn book_exists(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Path(book_id): Path<String>) -> Result<Json<BookExistsCommandResponse>, ServerError> {
    authorize_internal_action(state.config(), &headers,
                              params.get(INTERNAL_ACTION_TOKEN_PARAM).map(String::as_str))?;
    let req = BookExistsCommandRequest { book_id };
    let res = BookExistsCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/catalog", rate_limited(
            post(register_book), RateLimitConfig::per_minute(REGISTER_REQUESTS_PER_MINUTE)))
        .route("/catalog/filter_book", rate_limited(
            post(filter_books), RateLimitConfig::per_minute(FILTER_REQUESTS_PER_MINUTE)))
        .route("/catalog/book-exists/:id", rate_limited(
            get(book_exists), RateLimitConfig::per_minute(BOOK_EXISTS_REQUESTS_PER_MINUTE)))
        .with_state(state)
}
