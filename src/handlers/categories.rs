use axum::extract::State;
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::dao::UpdateOutcome;
use crate::database::models::{Category, Product};
use crate::error::ApiError;
use crate::middleware::extract::{Json, Path};
use crate::middleware::{AdminUser, ApiResponse, ApiResult};

/// GET /categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state
        .categories
        .list_all()
        .await
        .map_err(ApiError::database("Error retrieving categories"))?;

    Ok(ApiResponse::success(categories))
}

/// GET /categories/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Category> {
    state
        .categories
        .get_by_id(id)
        .await
        .map_err(ApiError::database("Error retrieving category"))?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

/// GET /categories/:id/products
pub async fn products(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Vec<Product>> {
    let products = state
        .products
        .list_by_category_id(id)
        .await
        .map_err(ApiError::database("Error retrieving products for category"))?;

    Ok(ApiResponse::success(products))
}

/// POST /categories (admin)
pub async fn post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(category): Json<Category>,
) -> ApiResult<Category> {
    let created = state
        .categories
        .create(&category)
        .await
        .map_err(ApiError::database("Error creating category"))?;

    info!("{} created category {}", admin.username, created.category_id);
    Ok(ApiResponse::created(created))
}

/// PUT /categories/:id (admin)
pub async fn put(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(category): Json<Category>,
) -> ApiResult<Category> {
    let outcome = state
        .categories
        .update(id, &category)
        .await
        .map_err(ApiError::database("Error updating category"))?;

    match outcome {
        UpdateOutcome::Updated(updated) => {
            info!("{} updated category {}", admin.username, id);
            Ok(ApiResponse::success(updated))
        }
        UpdateOutcome::NotFound => {
            warn!("Category {} does not exist; nothing updated", id);
            Err(ApiError::internal_server_error("Error updating category"))
        }
    }
}

/// DELETE /categories/:id (admin)
pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state
        .categories
        .delete(id)
        .await
        .map_err(ApiError::database("Error deleting category"))?;

    info!("{} deleted category {}", admin.username, id);
    Ok(ApiResponse::no_content())
}
