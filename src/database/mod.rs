pub mod dao;
pub mod manager;
pub mod mappers;
pub mod models;
pub mod query_builder;

pub use manager::{ConnectionProvider, DatabaseError, DatabaseManager, DbConnection};
