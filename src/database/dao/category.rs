use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{CategoryDao, UpdateOutcome};
use crate::database::manager::{ConnectionProvider, DatabaseError};
use crate::database::models::Category;
use crate::database::query_builder::QueryBuilder;
use crate::filter::SqlParam;

const TABLE: &str = "categories";
const PRIMARY_KEY: &str = "category_id";

pub struct PgCategoryDao {
    db: Arc<dyn ConnectionProvider>,
}

impl PgCategoryDao {
    pub fn new(db: Arc<dyn ConnectionProvider>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryDao for PgCategoryDao {
    async fn list_all(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<Category>::new(TABLE)?
            .order_by(PRIMARY_KEY)?
            .select_all(&mut conn)
            .await
    }

    async fn get_by_id(&self, category_id: i32) -> Result<Option<Category>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<Category>::new(TABLE)?
            .where_eq(PRIMARY_KEY, SqlParam::Int(category_id))?
            .select_optional(&mut conn)
            .await
    }

    async fn create(&self, category: &Category) -> Result<Category, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(category.name.as_str())
        .bind(category.description.as_str())
        .fetch_one(&mut *conn)
        .await?;

        info!("Created category {}", created.category_id);
        Ok(created)
    }

    async fn update(
        &self,
        category_id: i32,
        category: &Category,
    ) -> Result<UpdateOutcome<Category>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let updated = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, description = $2 WHERE category_id = $3 RETURNING *",
        )
        .bind(category.name.as_str())
        .bind(category.description.as_str())
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(match updated {
            Some(category) => UpdateOutcome::Updated(category),
            None => UpdateOutcome::NotFound,
        })
    }

    async fn delete(&self, category_id: i32) -> Result<(), DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&mut *conn)
            .await?;

        debug!("Deleted category {} ({} rows)", category_id, result.rows_affected());
        Ok(())
    }
}
