//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 안내 (이름, 사용법, 사용 가능한 모델)
//! - `/predict` - 당뇨병 위험 예측
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)

pub mod health;
pub mod info;
pub mod predict;

pub use health::{health_router, ComponentStatus, HealthResponse, ModelHealth};
pub use info::{service_info, ServiceInfoResponse};
pub use predict::{
    predict, ModelType, PatientRecord, PredictRequest, PredictionResponse, RiskLevel,
};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_info))
        .route("/predict", post(predict))
        .nest("/health", health_router())
}
