//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::{ApiErrorResponse, FieldErrors};
use crate::routes::{
    health, info, predict, ComponentStatus, HealthResponse, ModelHealth, ModelType,
    PatientRecord, PredictRequest, PredictionResponse, RiskLevel, ServiceInfoResponse,
};

/// Diabetes Prediction API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Diabetes Prediction API",
        description = r#"
# 당뇨병 위험 예측 REST API

8개 임상 지표로 당뇨병 위험을 예측합니다.

## 모델

- **basic**: 기본 분류기 (기본값)
- **ensemble**: 앙상블 분류기

`modelType`이 없거나 알 수 없는 값이면 basic 모델을 사용합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "service", description = "서비스 안내"),
        (name = "prediction", description = "예측 - 당뇨병 위험 분류"),
        (name = "health", description = "헬스 체크 - 서버 상태 확인")
    ),
    paths(
        info::service_info,
        predict::predict,
        health::health_check,
        health::health_ready,
    ),
    components(
        schemas(
            ServiceInfoResponse,
            PatientRecord,
            PredictRequest,
            PredictionResponse,
            ModelType,
            RiskLevel,
            ApiErrorResponse,
            FieldErrors,
            HealthResponse,
            ModelHealth,
            ComponentStatus,
        )
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui`: Swagger UI
/// - `/api-docs/openapi.json`: OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
