//! 당뇨병 위험 예측 API.
//!
//! POST /predict
//!
//! 처리 순서:
//! 1. 원본 payload 로깅
//! 2. 스키마 검증 → `PatientRecord` (누락/변환 불가 필드를 한 번에 보고)
//! 3. `modelType`으로 분류기 선택 (기본 basic, 알 수 없는 값도 basic)
//! 4. 분류 + 확률 추정 → `PredictionResponse`

pub mod types;

pub use types::{
    coerce_f64, ModelType, PatientRecord, PredictRequest, PredictionResponse, RiskLevel,
    FEATURE_FIELDS, MODEL_TYPE_FIELD,
};

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiErrorResponse, ApiResult, PredictError};
use crate::state::AppState;

/// POST /predict - 당뇨병 위험 예측.
#[utoipa::path(
    post,
    path = "/predict",
    tag = "prediction",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "예측 성공", body = PredictionResponse),
        (status = 400, description = "JSON 형식 오류 또는 입력 검증 실패", body = ApiErrorResponse),
        (status = 500, description = "모델 추론 실패", body = ApiErrorResponse)
    )
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let Json(payload) =
        payload.map_err(|rejection| PredictError::InvalidJson(rejection.body_text()))?;

    info!(payload = %payload, "Received prediction request");

    let body = payload
        .as_object()
        .ok_or_else(|| PredictError::InvalidJson("expected a JSON object".to_string()))?;

    let record = PatientRecord::from_json(body)?;
    let model_type = ModelType::from_request_value(body.get(MODEL_TYPE_FIELD));

    let response = state.predictions.predict(&record, model_type).await?;

    info!(
        model = %response.model_used,
        prediction = response.prediction,
        confidence = response.confidence,
        "Prediction served"
    );

    Ok(Json(response))
}
