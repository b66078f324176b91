//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 예측 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.
//! 레코더가 설치되지 않은 경우(테스트 등) 모든 기록 함수는 no-op입니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// 메트릭 라벨에 그대로 사용하는 알려진 경로.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/predict",
    "/health",
    "/health/ready",
    "/metrics",
    "/api-docs/openapi.json",
];

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 버킷 설정이 잘못되었거나 레코더가 이미 설치되어 있으면 `BuildError`를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full("inference_duration_seconds".to_string()),
            &[0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// 완료된 HTTP 요청 하나를 기록.
///
/// - `http_requests_total`: method, path, status 라벨 카운터
/// - `http_request_duration_seconds`: method, path 라벨 히스토그램
pub fn record_http_exchange(method: &str, path: &str, status: u16, duration_secs: f64) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 예측 메트릭 헬퍼 함수
// ============================================================================

/// 성공한 예측 카운터 증가.
pub fn record_prediction(model: &str, risk_level: &str) {
    counter!(
        "predictions_total",
        "model" => model.to_string(),
        "risk" => risk_level.to_string()
    )
    .increment(1);
}

/// 실패한 예측 카운터 증가.
pub fn record_prediction_error(code: &str) {
    counter!("prediction_errors_total", "code" => code.to_string()).increment(1);
}

/// 모델 추론 시간 기록.
pub fn record_inference_duration(model: &str, duration_secs: f64) {
    histogram!("inference_duration_seconds", "model" => model.to_string()).record(duration_secs);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 메트릭 라벨용 경로 정규화.
///
/// 알려진 엔드포인트는 그대로, 그 외(스캐너 요청, Swagger 정적 파일 등)는
/// `/other`로 묶어 라벨 cardinality를 제한합니다.
pub fn normalize_path(path: &str) -> String {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    if KNOWN_PATHS.contains(&trimmed) {
        trimmed.to_string()
    } else if trimmed.starts_with("/swagger-ui") {
        "/swagger-ui".to_string()
    } else {
        "/other".to_string()
    }
}
