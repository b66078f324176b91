//! 서비스 안내 endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::routes::predict::ModelType;

/// 서비스 안내 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    pub message: String,
    pub usage: String,
    pub models_available: Vec<ModelType>,
}

impl ServiceInfoResponse {
    /// 고정 서비스 안내.
    pub fn describe() -> Self {
        Self {
            message: "Diabetes Prediction API is running".to_string(),
            usage: "Send a POST request to /predict with the required data".to_string(),
            models_available: ModelType::ALL.to_vec(),
        }
    }
}

/// GET / - 서비스 안내.
///
/// 쿼리 파라미터와 헤더에 관계없이 항상 같은 본문을 반환합니다.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "서비스 안내", body = ServiceInfoResponse)
    )
)]
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse::describe())
}
