//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: the `Device` row and its status
//! - `schema.rs`: SQL DDL and the seed device list (SQLite)
//! - `sqlite.rs`: queries against the `devices` table

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Device, DeviceStatus};
pub use schema::{SEED_DEVICES, SQLITE_INIT};
pub use sqlite::{DevicesStorage, SqlitePool, connect};
