use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::handlers::devices::{
    checkin_device, checkout_device, index_page, list_devices, not_found,
};
use crate::middleware::{log_request, permissive_cors};
use crate::service::DeviceTracker;

/// Largest accepted request body; checkout/checkin payloads are tiny.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct TrackerState {
    pub tracker: DeviceTracker,
}

impl TrackerState {
    pub fn new(tracker: DeviceTracker) -> Self {
        Self { tracker }
    }
}

pub fn tracker_router(state: TrackerState) -> Router {
    Router::new()
        .route("/", get(index_page).fallback(not_found))
        .route("/api/devices", get(list_devices).fallback(not_found))
        .route("/api/checkout", post(checkout_device).fallback(not_found))
        .route("/api/checkin", post(checkin_device).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(permissive_cors))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
