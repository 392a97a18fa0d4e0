use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::Device;
use crate::error::ApiError;
use crate::middleware::JsonBody;
use crate::{TrackerError, router::TrackerState};

const INDEX_HTML: &str = include_str!("../web/index.html");

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub device: Option<String>,
    pub borrower: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub device: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    fn ok(message: String) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

/// Returns the trimmed value when present and non-blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// GET / -> the device board.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/devices -> every device ordered by name.
pub async fn list_devices(
    State(state): State<TrackerState>,
) -> Result<Json<Vec<Device>>, TrackerError> {
    let devices = state.tracker.list_all().await?;
    debug!(count = devices.len(), "listed devices");
    Ok(Json(devices))
}

/// POST /api/checkout {device, borrower}
pub async fn checkout_device(
    State(state): State<TrackerState>,
    JsonBody(body): JsonBody<CheckoutRequest>,
) -> Result<Json<ActionResponse>, TrackerError> {
    let (Some(device), Some(borrower)) = (
        required(body.device.as_deref()),
        required(body.borrower.as_deref()),
    ) else {
        return Err(TrackerError::Validation("Device and borrower are required"));
    };

    state.tracker.checkout(device, borrower).await?;
    Ok(ActionResponse::ok(format!(
        "{device} checked out to {borrower}"
    )))
}

/// POST /api/checkin {device}
pub async fn checkin_device(
    State(state): State<TrackerState>,
    JsonBody(body): JsonBody<CheckinRequest>,
) -> Result<Json<ActionResponse>, TrackerError> {
    let Some(device) = required(body.device.as_deref()) else {
        return Err(TrackerError::Validation("Device is required"));
    };

    state.tracker.checkin(device).await?;
    Ok(ActionResponse::ok(format!("{device} checked in")))
}

/// Any unmatched method/path.
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    debug!(%method, path = %uri.path(), "no route");
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::required;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  Alice ")), Some("Alice"));
        assert_eq!(required(Some("   ")), None);
        assert_eq!(required(Some("")), None);
        assert_eq!(required(None), None);
    }
}
