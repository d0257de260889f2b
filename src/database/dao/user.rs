use std::sync::Arc;

use async_trait::async_trait;

use super::UserDao;
use crate::database::manager::{ConnectionProvider, DatabaseError};
use crate::database::models::User;
use crate::database::query_builder::QueryBuilder;
use crate::filter::SqlParam;

pub struct PgUserDao {
    db: Arc<dyn ConnectionProvider>,
}

impl PgUserDao {
    pub fn new(db: Arc<dyn ConnectionProvider>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDao for PgUserDao {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<User>::new("users")?
            .where_eq("username", SqlParam::Text(username.to_string()))?
            .select_optional(&mut conn)
            .await
    }
}
