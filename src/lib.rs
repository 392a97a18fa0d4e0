pub mod config;
pub mod error;
pub mod service;
pub mod router;
pub mod middleware;
pub mod handlers;
pub mod db;

pub use error::TrackerError;
pub use service::DeviceTracker;
