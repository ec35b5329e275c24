//! Database module: models, schema and storage for blog posts.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL and the fixed statements issued at runtime
//! - `mysql.rs`: pool-backed storage used by startup and request handling

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::Post;
pub use mysql::{MySqlPool, PostsStorage};
pub use schema::SEED_POST_COUNT;
