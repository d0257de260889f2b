//! Data access objects, one per entity.
//!
//! Every method acquires a single connection from the injected
//! [`ConnectionProvider`](crate::database::ConnectionProvider) and releases it
//! before returning. Absence is reported as `None` or
//! [`UpdateOutcome::NotFound`], never as an error.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, Product, Profile, User};
use crate::filter::ProductFilter;

pub mod category;
pub mod product;
pub mod profile;
pub mod user;

pub use category::PgCategoryDao;
pub use product::PgProductDao;
pub use profile::PgProfileDao;
pub use user::PgUserDao;

/// Result of an update that targets a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    /// The row was changed; carries the stored record after the update.
    Updated(T),
    /// No row matched the identifier.
    NotFound,
}

#[async_trait]
pub trait CategoryDao: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn get_by_id(&self, category_id: i32) -> Result<Option<Category>, DatabaseError>;

    async fn create(&self, category: &Category) -> Result<Category, DatabaseError>;

    async fn update(
        &self,
        category_id: i32,
        category: &Category,
    ) -> Result<UpdateOutcome<Category>, DatabaseError>;

    /// Deleting a missing id is not an error
    async fn delete(&self, category_id: i32) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ProductDao: Send + Sync {
    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError>;

    async fn list_by_category_id(&self, category_id: i32) -> Result<Vec<Product>, DatabaseError>;

    async fn get_by_id(&self, product_id: i32) -> Result<Option<Product>, DatabaseError>;

    /// Inserts and returns the row as stored, generated id included
    async fn create(&self, product: &Product) -> Result<Product, DatabaseError>;

    async fn update(
        &self,
        product_id: i32,
        product: &Product,
    ) -> Result<UpdateOutcome<Product>, DatabaseError>;

    async fn delete(&self, product_id: i32) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ProfileDao: Send + Sync {
    async fn create(&self, profile: &Profile) -> Result<Profile, DatabaseError>;

    async fn get_by_user_id(&self, user_id: i32) -> Result<Option<Profile>, DatabaseError>;

    /// Updates the profile owned by `profile.user_id`
    async fn update(&self, profile: &Profile) -> Result<UpdateOutcome<Profile>, DatabaseError>;
}

#[async_trait]
pub trait UserDao: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}
