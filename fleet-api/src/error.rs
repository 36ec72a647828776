use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum FleetApiError {
    Fleet(StatusCode, ErrorDetail),
    Internal(ApiError),
}

impl FleetApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FleetApiError::Fleet(status, _) => Some(*status),
            FleetApiError::Internal(_) => None,
        }
    }
}

impl From<ApiError> for FleetApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                // Some gateways answer with plain text instead of the JSON envelope
                let error = serde_json::from_str::<ErrorResponse>(&detail)
                    .map(|response| response.error)
                    .unwrap_or_else(|_| ErrorDetail {
                        id: status.as_u16().to_string(),
                        name: status.canonical_reason().unwrap_or("error").to_string(),
                        detail,
                    });
                FleetApiError::Fleet(status, error)
            }
            e => FleetApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for FleetApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetApiError::Internal(e) => write!(f, "Internal error: {}", e),
            FleetApiError::Fleet(status, detail) => {
                write!(f, "({}) {}: {}", status, detail.name, detail.detail)
            }
        }
    }
}

impl std::error::Error for FleetApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub id: String,
    pub name: String,
    pub detail: String,
}
