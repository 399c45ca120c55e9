//! Filtered, paginated resource listings.

use crate::{error::ApiError, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
};
use bookstore_core::{Author, Book, Customer, PaginationConfig, User};
use bookstore_filter::{
    AUTHORS, BOOKS, CUSTOMERS, FilterSchema, Page, PageRequest, PagedRepository, USERS, compile,
};
use std::sync::Arc;

type Params = Vec<(String, String)>;

async fn list<T>(
    repo: &dyn PagedRepository<T>,
    schema: &FilterSchema,
    params: &Params,
    pagination: PaginationConfig,
) -> Result<Json<Page<T>>, ApiError> {
    let pairs = || params.iter().map(|(k, v)| (k.as_str(), v.as_str()));

    let spec = schema.spec_from_query(pairs())?;
    let request = PageRequest::from_query(pairs(), pagination)?;
    let predicate = compile(schema, &spec);

    tracing::debug!(
        resource = schema.resource,
        predicate = %predicate,
        page = request.page,
        size = request.size,
        "listing"
    );
    Ok(Json(repo.find_page(&predicate, request).await?))
}

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> Result<Json<Page<Book>>, ApiError> {
    list(state.books.as_ref(), &BOOKS, &params, state.pagination).await
}

pub async fn list_authors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> Result<Json<Page<Author>>, ApiError> {
    list(state.authors.as_ref(), &AUTHORS, &params, state.pagination).await
}

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> Result<Json<Page<Customer>>, ApiError> {
    list(state.customers.as_ref(), &CUSTOMERS, &params, state.pagination).await
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> Result<Json<Page<User>>, ApiError> {
    list(state.users.as_ref(), &USERS, &params, state.pagination).await
}
