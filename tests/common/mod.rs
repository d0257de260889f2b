#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use shop_api::app::{app, AppState};
use shop_api::auth::{generate_jwt, Claims, Role};
use shop_api::database::dao::{CategoryDao, ProductDao, ProfileDao, UpdateOutcome, UserDao};
use shop_api::database::models::{Category, Product, Profile, User};
use shop_api::database::{ConnectionProvider, DatabaseError, DbConnection};
use shop_api::filter::ProductFilter;

/// Connection provider for in-process tests; there is never a live database.
pub struct NoDatabase {
    pub healthy: bool,
}

#[async_trait]
impl ConnectionProvider for NoDatabase {
    async fn acquire(&self) -> Result<DbConnection, DatabaseError> {
        Err(DatabaseError::QueryError("no database in tests".into()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        if self.healthy {
            Ok(())
        } else {
            Err(DatabaseError::QueryError("connection refused".into()))
        }
    }
}

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    profiles: Vec<Profile>,
    users: Vec<User>,
    next_category_id: i32,
    next_product_id: i32,
}

/// In-memory implementation of every DAO trait, shared by all handlers.
/// Setting `failing` makes every call return a database error.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if *self.failing.lock().unwrap() {
            return Err(DatabaseError::QueryError("simulated outage".into()));
        }
        Ok(())
    }

    pub fn add_user(&self, user_id: i32, username: &str, role: Role) {
        self.tables.lock().unwrap().users.push(User {
            user_id,
            username: username.to_string(),
            role: role.as_str().to_string(),
        });
    }

    pub fn add_category(&self, name: &str) -> Category {
        let mut tables = self.tables.lock().unwrap();
        tables.next_category_id += 1;
        let category = Category {
            category_id: tables.next_category_id,
            name: name.to_string(),
            description: format!("All things {}", name.to_lowercase()),
        };
        tables.categories.push(category.clone());
        category
    }

    pub fn add_product(&self, name: &str, price: &str, category_id: i32, color: Option<&str>) -> Product {
        let mut tables = self.tables.lock().unwrap();
        tables.next_product_id += 1;
        let product = Product {
            product_id: tables.next_product_id,
            name: name.to_string(),
            price: price.parse().unwrap(),
            category_id,
            description: String::new(),
            color: color.map(str::to_string),
            stock: 10,
            featured: false,
            image_url: None,
        };
        tables.products.push(product.clone());
        product
    }

    pub fn add_profile(&self, user_id: i32, first_name: &str) {
        let mut profile = sample_profile(first_name);
        profile.user_id = user_id;
        self.tables.lock().unwrap().profiles.push(profile);
    }

    pub fn profile_for(&self, user_id: i32) -> Option<Profile> {
        let tables = self.tables.lock().unwrap();
        tables.profiles.iter().find(|p| p.user_id == user_id).cloned()
    }

    pub fn product(&self, product_id: i32) -> Option<Product> {
        let tables = self.tables.lock().unwrap();
        tables.products.iter().find(|p| p.product_id == product_id).cloned()
    }

    pub fn category(&self, category_id: i32) -> Option<Category> {
        let tables = self.tables.lock().unwrap();
        tables.categories.iter().find(|c| c.category_id == category_id).cloned()
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    filter.category_id.map_or(true, |id| product.category_id == id)
        && filter.min_price.map_or(true, |min| product.price >= min)
        && filter.max_price.map_or(true, |max| product.price <= max)
        && filter
            .color()
            .map_or(true, |color| product.color.as_deref() == Some(color))
}

#[async_trait]
impl CategoryDao for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>, DatabaseError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().categories.clone())
    }

    async fn get_by_id(&self, category_id: i32) -> Result<Option<Category>, DatabaseError> {
        self.check()?;
        Ok(self.category(category_id))
    }

    async fn create(&self, category: &Category) -> Result<Category, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_category_id += 1;
        let mut created = category.clone();
        created.category_id = tables.next_category_id;
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        category_id: i32,
        category: &Category,
    ) -> Result<UpdateOutcome<Category>, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.categories.iter_mut().find(|c| c.category_id == category_id) {
            Some(stored) => {
                stored.name = category.name.clone();
                stored.description = category.description.clone();
                Ok(UpdateOutcome::Updated(stored.clone()))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn delete(&self, category_id: i32) -> Result<(), DatabaseError> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .categories
            .retain(|c| c.category_id != category_id);
        Ok(())
    }
}

#[async_trait]
impl ProductDao for MemoryStore {
    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, DatabaseError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect())
    }

    async fn list_by_category_id(&self, category_id: i32) -> Result<Vec<Product>, DatabaseError> {
        self.search(&ProductFilter {
            category_id: Some(category_id),
            ..Default::default()
        })
        .await
    }

    async fn get_by_id(&self, product_id: i32) -> Result<Option<Product>, DatabaseError> {
        self.check()?;
        Ok(self.product(product_id))
    }

    async fn create(&self, product: &Product) -> Result<Product, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_product_id += 1;
        let mut created = product.clone();
        created.product_id = tables.next_product_id;
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        product_id: i32,
        product: &Product,
    ) -> Result<UpdateOutcome<Product>, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.products.iter_mut().find(|p| p.product_id == product_id) {
            Some(stored) => {
                *stored = Product {
                    product_id,
                    ..product.clone()
                };
                Ok(UpdateOutcome::Updated(stored.clone()))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn delete(&self, product_id: i32) -> Result<(), DatabaseError> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .products
            .retain(|p| p.product_id != product_id);
        Ok(())
    }
}

#[async_trait]
impl ProfileDao for MemoryStore {
    async fn create(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.profiles.iter().any(|p| p.user_id == profile.user_id) {
            return Err(DatabaseError::QueryError("duplicate key value".into()));
        }
        tables.profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn get_by_user_id(&self, user_id: i32) -> Result<Option<Profile>, DatabaseError> {
        self.check()?;
        Ok(self.profile_for(user_id))
    }

    async fn update(&self, profile: &Profile) -> Result<UpdateOutcome<Profile>, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(UpdateOutcome::Updated(stored.clone()))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }
}

#[async_trait]
impl UserDao for MemoryStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

/// Router over an in-memory store seeded with one admin (id 1) and one
/// regular user (id 2).
pub fn test_app() -> TestApp {
    test_app_with_health(true)
}

pub fn test_app_with_health(healthy: bool) -> TestApp {
    let store = MemoryStore::new();
    store.add_user(1, "admin", Role::Admin);
    store.add_user(2, "user", Role::User);

    let shared = Arc::new(store.clone());
    let state = AppState {
        db: Arc::new(NoDatabase { healthy }),
        categories: shared.clone(),
        products: shared.clone(),
        profiles: shared.clone(),
        users: shared,
    };

    TestApp {
        router: app(state),
        store,
    }
}

pub fn token_for(username: &str, role: Role) -> String {
    generate_jwt(&Claims::new(username, role)).expect("token generation")
}

pub fn admin_token() -> String {
    token_for("admin", Role::Admin)
}

pub fn user_token() -> String {
    token_for("user", Role::User)
}

pub fn price(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn sample_profile(first_name: &str) -> Profile {
    Profile {
        user_id: 0,
        first_name: first_name.to_string(),
        last_name: "Smith".to_string(),
        phone: "555-0100".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
    }
}

/// Send one request through the router and decode the body. An empty body
/// is `Null`; a non-JSON body (axum extractor rejections) comes back as a
/// JSON string.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, value))
}

pub async fn get(router: &Router, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
    send(router, Method::GET, uri, token, None).await
}
