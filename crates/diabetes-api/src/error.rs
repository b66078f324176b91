//! API 에러 분류 계층.
//!
//! 모든 요청 실패를 명시적으로 분류하여 안정적인 에러 코드와 HTTP 상태로 매핑합니다.
//!
//! | 조건 | 상태 | 코드 |
//! |---|---|---|
//! | 본문이 JSON 객체가 아님 | 400 | `INVALID_JSON` |
//! | 필수 필드 누락 또는 숫자 변환 불가 | 400 | `VALIDATION_ERROR` |
//! | 분류기 실패 또는 계약 위반 출력 | 500 | `INFERENCE_ERROR` |
//! | 추론 태스크 패닉/취소 | 500 | `INTERNAL_ERROR` |
//!
//! 내부 에러 메시지는 로그로만 남기고 클라이언트에는 고정 메시지를 반환합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diabetes_ml::MlError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::metrics::record_prediction_error;

/// API 에러 응답.
///
/// `error` 키는 기계가 읽을 수 있는 안정적인 에러 코드입니다.
///
/// # 예시
///
/// ```json
/// {
///   "error": "VALIDATION_ERROR",
///   "message": "필수 입력값이 누락되었거나 숫자가 아닙니다",
///   "details": { "missing": ["glucose"], "invalid": ["age"] },
///   "timestamp": 1760000000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "INFERENCE_ERROR")
    #[serde(rename = "error")]
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// # Example
    ///
    /// ```
    /// use diabetes_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("INFERENCE_ERROR", "Model inference failed");
    /// assert_eq!(error.code(), "INFERENCE_ERROR");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// 필드 검증 실패 목록.
///
/// 두 목록 모두 고정 feature 순서를 따릅니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrors {
    /// 요청에 없는 필드
    pub missing: Vec<String>,
    /// 존재하지만 숫자로 변환할 수 없는 필드
    pub invalid: Vec<String>,
}

impl FieldErrors {
    /// 실패한 필드가 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// 예측 요청 처리 에러.
#[derive(Debug, Error)]
pub enum PredictError {
    /// 본문이 JSON이 아니거나 JSON 객체가 아님
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// 필수 필드 누락 또는 숫자 변환 불가
    #[error("Invalid prediction input (missing: {:?}, invalid: {:?})", .0.missing, .0.invalid)]
    Validation(FieldErrors),

    /// 분류기 추론 실패
    #[error("Inference failed: {0}")]
    Inference(#[from] MlError),

    /// 추론 태스크 실행 실패
    #[error("Prediction task failed: {0}")]
    Internal(String),
}

impl PredictError {
    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::InvalidJson(_) | PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::Inference(_) | PredictError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 안정적인 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            PredictError::InvalidJson(_) => "INVALID_JSON",
            PredictError::Validation(_) => "VALIDATION_ERROR",
            PredictError::Inference(_) => "INFERENCE_ERROR",
            PredictError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 클라이언트에 반환할 응답 본문 생성.
    pub fn to_response_body(&self) -> ApiErrorResponse {
        match self {
            PredictError::InvalidJson(reason) => ApiErrorResponse::new(
                self.code(),
                format!("요청 본문은 JSON 객체여야 합니다: {}", reason),
            ),
            PredictError::Validation(fields) => ApiErrorResponse::with_details(
                self.code(),
                "필수 입력값이 누락되었거나 숫자가 아닙니다",
                serde_json::to_value(fields).unwrap_or(Value::Null),
            ),
            PredictError::Inference(_) => {
                ApiErrorResponse::new(self.code(), "모델 추론에 실패했습니다")
            }
            PredictError::Internal(_) => {
                ApiErrorResponse::new(self.code(), "예측 처리 중 내부 오류가 발생했습니다")
            }
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Prediction failed");
        } else {
            warn!(code = self.code(), error = %self, "Prediction request rejected");
        }

        let body = self.to_response_body();
        record_prediction_error(body.code());

        (status, Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code(), "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_error_key_is_code() {
        let error = ApiErrorResponse::new("INFERENCE_ERROR", "failed");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["error"], "INFERENCE_ERROR");
        assert!(json.get("code").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_status_mapping() {
        let validation = PredictError::Validation(FieldErrors {
            missing: vec!["glucose".to_string()],
            invalid: vec![],
        });
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.code(), "VALIDATION_ERROR");

        let json = PredictError::InvalidJson("EOF".to_string());
        assert_eq!(json.status_code(), StatusCode::BAD_REQUEST);

        let inference = PredictError::from(MlError::Inference("session crashed".to_string()));
        assert_eq!(inference.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(inference.code(), "INFERENCE_ERROR");

        let internal = PredictError::Internal("join error".to_string());
        assert_eq!(internal.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let error = PredictError::Validation(FieldErrors {
            missing: vec!["glucose".to_string(), "age".to_string()],
            invalid: vec!["bmi".to_string()],
        });
        let body = error.to_response_body();
        let details = body.details.unwrap();

        assert_eq!(details["missing"], serde_json::json!(["glucose", "age"]));
        assert_eq!(details["invalid"], serde_json::json!(["bmi"]));
    }

    #[test]
    fn test_inference_body_hides_internal_message() {
        let error = PredictError::from(MlError::Inference("CUDA out of memory".to_string()));
        let body = error.to_response_body();

        assert!(!body.message.contains("CUDA"));
        assert!(body.details.is_none());
    }
}
