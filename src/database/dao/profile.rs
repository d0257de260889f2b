use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{ProfileDao, UpdateOutcome};
use crate::database::manager::{ConnectionProvider, DatabaseError};
use crate::database::models::Profile;
use crate::database::query_builder::QueryBuilder;
use crate::filter::SqlParam;

pub struct PgProfileDao {
    db: Arc<dyn ConnectionProvider>,
}

impl PgProfileDao {
    pub fn new(db: Arc<dyn ConnectionProvider>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileDao for PgProfileDao {
    async fn create(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let created = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id, first_name, last_name, phone, email, address, city, state, zip) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(profile.user_id)
        .bind(profile.first_name.as_str())
        .bind(profile.last_name.as_str())
        .bind(profile.phone.as_str())
        .bind(profile.email.as_str())
        .bind(profile.address.as_str())
        .bind(profile.city.as_str())
        .bind(profile.state.as_str())
        .bind(profile.zip.as_str())
        .fetch_one(&mut *conn)
        .await?;

        info!("Created profile for user {}", created.user_id);
        Ok(created)
    }

    async fn get_by_user_id(&self, user_id: i32) -> Result<Option<Profile>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        QueryBuilder::<Profile>::new("profiles")?
            .where_eq("user_id", SqlParam::Int(user_id))?
            .select_optional(&mut conn)
            .await
    }

    async fn update(&self, profile: &Profile) -> Result<UpdateOutcome<Profile>, DatabaseError> {
        let mut conn = self.db.acquire().await?;
        let updated = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET first_name = $1, last_name = $2, phone = $3, email = $4, address = $5, \
             city = $6, state = $7, zip = $8 WHERE user_id = $9 RETURNING *",
        )
        .bind(profile.first_name.as_str())
        .bind(profile.last_name.as_str())
        .bind(profile.phone.as_str())
        .bind(profile.email.as_str())
        .bind(profile.address.as_str())
        .bind(profile.city.as_str())
        .bind(profile.state.as_str())
        .bind(profile.zip.as_str())
        .bind(profile.user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(match updated {
            Some(profile) => UpdateOutcome::Updated(profile),
            None => UpdateOutcome::NotFound,
        })
    }
}
