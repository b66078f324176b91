//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 부팅 시 한 번 생성되어 Arc로 래핑된 뒤
//! Axum의 State extractor를 통해 핸들러에 주입됩니다.
//! 생성 이후 변경되지 않습니다.

use diabetes_ml::{ClassifierConfig, MlResult, OnnxClassifier};
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::services::PredictionService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 예측 서비스 - basic/ensemble 분류기 보유
    pub predictions: PredictionService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(predictions: PredictionService) -> Self {
        Self {
            predictions,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정된 경로에서 두 ONNX 모델을 로드하여 상태 생성.
    ///
    /// # Errors
    /// 어느 한 모델 파일이라도 없거나 손상되었으면 `MlError::ModelLoad`를 반환합니다.
    /// 부팅 시점의 치명적 에러로 취급됩니다.
    pub fn load(config: &ServerConfig) -> MlResult<Self> {
        let basic = OnnxClassifier::load(
            ClassifierConfig::new(&config.basic_model_path)
                .with_model_name("basic")
                .with_input_name(&config.model_input_name),
        )?;
        let ensemble = OnnxClassifier::load(
            ClassifierConfig::new(&config.ensemble_model_path)
                .with_model_name("ensemble")
                .with_input_name(&config.model_input_name),
        )?;

        info!("Both classifiers loaded");

        Ok(Self::new(PredictionService::new(
            Arc::new(basic),
            Arc::new(ensemble),
        )))
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 모델 파일 없이 결정적 mock 분류기로 상태를 생성합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use diabetes_ml::MockClassifier;

    AppState::new(PredictionService::new(
        Arc::new(MockClassifier::new("basic")),
        Arc::new(MockClassifier::new("ensemble")),
    ))
}
