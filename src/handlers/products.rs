use axum::extract::State;
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::dao::UpdateOutcome;
use crate::database::models::Product;
use crate::error::ApiError;
use crate::filter::ProductFilter;
use crate::middleware::extract::{Json, Path, Query};
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/// GET /products?cat=&minPrice=&maxPrice=&color=
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Vec<Product>> {
    let products = state
        .products
        .search(&filter)
        .await
        .map_err(ApiError::database("Error retrieving products."))?;

    Ok(ApiResponse::success(products))
}

/// GET /products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Product> {
    state
        .products
        .get_by_id(id)
        .await
        .map_err(ApiError::database("Error retrieving product."))?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Product not found."))
}

/// POST /products (admin)
pub async fn post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> ApiResult<Product> {
    let created = state
        .products
        .create(&product)
        .await
        .map_err(ApiError::database("Error creating product."))?;

    info!("{} created product {}", admin.username, created.product_id);
    Ok(ApiResponse::created(created))
}

/// PUT /products/:id (admin). Updating a missing product is a server error.
pub async fn put(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(product): Json<Product>,
) -> ApiResult<Product> {
    let outcome = state
        .products
        .update(id, &product)
        .await
        .map_err(ApiError::database("Error updating product."))?;

    match outcome {
        UpdateOutcome::Updated(updated) => {
            info!("{} updated product {}", admin.username, id);
            Ok(ApiResponse::success(updated))
        }
        UpdateOutcome::NotFound => {
            warn!("Product {} not found for update", id);
            Err(ApiError::internal_server_error("Error updating product."))
        }
    }
}

/// DELETE /products/:id (admin)
pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    let existing = state
        .products
        .get_by_id(id)
        .await
        .map_err(ApiError::database("Error deleting product."))?;
    if existing.is_none() {
        return Err(ApiError::not_found("Product not found."));
    }

    state
        .products
        .delete(id)
        .await
        .map_err(ApiError::database("Error deleting product."))?;

    info!("{} deleted product {}", admin.username, id);
    Ok(ApiResponse::no_content())
}
