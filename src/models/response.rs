use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success outcome handed back to the caller of the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            data,
            message: message.into(),
            status_code,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
