use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, info, warn};

use super::{ProductDao, UpdateOutcome};
use crate::database::manager::{ConnectionProvider, DatabaseError};
use crate::database::models::Product;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{ProductFilter, SqlParam};

const TABLE: &str = "products";
const PRIMARY_KEY: &str = "product_id";

pub struct PgProductDao {
    db: Arc<dyn ConnectionProvider>,
}

impl PgProductDao {
    pub fn new(db: Arc<dyn ConnectionProvider>) -> Self {
        Self { db }
    }

    async fn fetch_by_id(
        conn: &mut PgConnection,
        product_id: i32,
    ) -> Result<Option<Product>, DatabaseError> {
        QueryBuilder::<Product>::new(TABLE)?
            .where_eq(PRIMARY_KEY, SqlParam::Int(product_id))?
            .select_optional(conn)
            .await
    }
}

#[async_trait]
impl ProductDao for PgProductDao {
    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<Product>::new(TABLE)?
            .filter(filter.conditions())?
            .order_by(PRIMARY_KEY)?
            .select_all(&mut conn)
            .await
    }

    async fn list_by_category_id(&self, category_id: i32) -> Result<Vec<Product>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<Product>::new(TABLE)?
            .where_eq("category_id", SqlParam::Int(category_id))?
            .order_by(PRIMARY_KEY)?
            .select_all(&mut conn)
            .await
    }

    async fn get_by_id(&self, product_id: i32) -> Result<Option<Product>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        Self::fetch_by_id(&mut conn, product_id).await
    }

    async fn create(&self, product: &Product) -> Result<Product, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let product_id: i32 = sqlx::query_scalar(
            "INSERT INTO products (name, price, category_id, description, color, image_url, stock, featured) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING product_id",
        )
        .bind(product.name.as_str())
        .bind(product.price)
        .bind(product.category_id)
        .bind(product.description.as_str())
        .bind(product.color.as_deref())
        .bind(product.image_url.as_deref())
        .bind(product.stock)
        .bind(product.featured)
        .fetch_one(&mut *conn)
        .await?;

        info!("Created product {}", product_id);

        // Re-read so defaults and triggers are reflected in the result
        Self::fetch_by_id(&mut conn, product_id).await?.ok_or_else(|| {
            DatabaseError::QueryError(format!("product {} missing after insert", product_id))
        })
    }

    async fn update(
        &self,
        product_id: i32,
        product: &Product,
    ) -> Result<UpdateOutcome<Product>, DatabaseError> {
        let mut conn = self.db.acquire().await?;

        if Self::fetch_by_id(&mut conn, product_id).await?.is_none() {
            warn!("Product {} not found for update", product_id);
            return Ok(UpdateOutcome::NotFound);
        }

        let result = sqlx::query(
            "UPDATE products SET name = $1, price = $2, category_id = $3, description = $4, color = $5, \
             image_url = $6, stock = $7, featured = $8 WHERE product_id = $9",
        )
        .bind(product.name.as_str())
        .bind(product.price)
        .bind(product.category_id)
        .bind(product.description.as_str())
        .bind(product.color.as_deref())
        .bind(product.image_url.as_deref())
        .bind(product.stock)
        .bind(product.featured)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        // Row vanished between the check and the update
        if result.rows_affected() == 0 {
            warn!("Update of product {} affected no rows", product_id);
            return Ok(UpdateOutcome::NotFound);
        }

        Ok(match Self::fetch_by_id(&mut conn, product_id).await? {
            Some(updated) => UpdateOutcome::Updated(updated),
            None => UpdateOutcome::NotFound,
        })
    }

    async fn delete(&self, product_id: i32) -> Result<(), DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *conn)
            .await?;

        debug!("Deleted product {} ({} rows)", product_id, result.rows_affected());
        Ok(())
    }
}
