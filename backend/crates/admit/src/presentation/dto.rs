//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request for POST /query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub name: String,
    pub id: String,
}

/// Response for POST /query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Query string for GET /download
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub path: Option<String>,
}
