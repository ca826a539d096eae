//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use vitrine_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// List products, optionally filtered by category or search term.
///
/// `category` wins when both filters are present, matching the original
/// endpoint's precedence.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = if let Some(category) = query.category {
        state.products().get_by_category(&category).await?
    } else if let Some(search) = query.search {
        state.products().search(&search).await?
    } else {
        state.products().get_all().await?
    };

    Ok(Json(products))
}

/// Get a single product by ID.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state
        .products()
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(product))
}

/// List all distinct product categories.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.products().categories().await?))
}
