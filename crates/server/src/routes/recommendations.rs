//! Recommendation route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use vitrine_core::{ProductId, UserId};

use crate::error::Result;
use crate::services::recommendation::Recommendation;
use crate::state::AppState;

/// Query parameters selecting the recommendation mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
}

/// Recommendations for a product page, a user, or (with no parameters) the
/// popularity fallback. A product id takes precedence over a user id.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Vec<Recommendation>>> {
    let recommendations = if let Some(product_id) = query.product_id {
        state
            .recommendations()
            .for_product(ProductId::new(product_id))
            .await?
    } else if let Some(user_id) = query.user_id {
        state
            .recommendations()
            .for_user(UserId::new(user_id))
            .await?
    } else {
        state.recommendations().popular().await?
    };

    Ok(Json(recommendations))
}
