use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Available,
    CheckedOut,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::CheckedOut => "checked_out",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown device status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for DeviceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(DeviceStatus::Available),
            "checked_out" => Ok(DeviceStatus::CheckedOut),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One row of the `devices` table, serialized as-is by `GET /api/devices`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub borrower: Option<String>,
    pub checked_out_date: Option<DateTime<Utc>>,
    pub status: DeviceStatus,
}

#[cfg(test)]
impl Device {
    /// `Available` iff neither borrower nor date is set; `CheckedOut` iff both are.
    pub(crate) fn is_consistent(&self) -> bool {
        match self.status {
            DeviceStatus::Available => self.borrower.is_none() && self.checked_out_date.is_none(),
            DeviceStatus::CheckedOut => self.borrower.is_some() && self.checked_out_date.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(DeviceStatus::CheckedOut).unwrap(),
            json!("checked_out")
        );
        assert_eq!("available".parse::<DeviceStatus>(), Ok(DeviceStatus::Available));
        let err = "lost".parse::<DeviceStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("lost".to_string()));
        assert_eq!(err.to_string(), "unknown device status `lost`");
    }

    #[test]
    fn available_device_serializes_nulls() {
        let device = Device {
            id: 1,
            name: "Pixel 8".to_string(),
            borrower: None,
            checked_out_date: None,
            status: DeviceStatus::Available,
        };
        assert!(device.is_consistent());
        assert_eq!(
            serde_json::to_value(&device).unwrap(),
            json!({
                "id": 1,
                "name": "Pixel 8",
                "borrower": null,
                "checked_out_date": null,
                "status": "available"
            })
        );
    }

    #[test]
    fn half_checked_out_is_inconsistent() {
        let device = Device {
            id: 2,
            name: "iPad Air".to_string(),
            borrower: Some("Alice".to_string()),
            checked_out_date: None,
            status: DeviceStatus::CheckedOut,
        };
        assert!(!device.is_consistent());
    }
}
