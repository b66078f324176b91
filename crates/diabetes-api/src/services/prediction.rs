//! 예측 서비스.
//!
//! 부팅 시 한 번 로드된 두 분류기를 보유하고, 검증된 레코드에 대해
//! 모델 선택 → 분류 → 확률 추정 → 응답 생성을 수행합니다.

use diabetes_ml::{BinaryClassifier, FeatureVector, MlError, MlResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::PredictError;
use crate::metrics::{record_inference_duration, record_prediction};
use crate::routes::predict::types::{ModelType, PatientRecord, PredictionResponse, RiskLevel};

/// 단일 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// 예측 레이블 (0 또는 1)
    pub label: u8,
    /// 예측 클래스의 확률 (0.0 ~ 1.0)
    pub probability: f32,
}

/// 분류기를 한 번 호출하여 레이블과 해당 클래스 확률을 구합니다.
///
/// 레이블이 {0, 1} 밖이거나, 확률 벡터를 레이블로 인덱싱할 수 없거나,
/// 확률이 [0, 1] 범위를 벗어나면 `MlError::UnexpectedOutput`을 반환합니다.
pub fn classify(
    classifier: &dyn BinaryClassifier,
    features: &FeatureVector,
) -> MlResult<Classification> {
    let (label, probabilities) = classifier.predict_with_proba(features)?;
    if label > 1 {
        return Err(MlError::UnexpectedOutput(format!(
            "{}: label {} is not binary",
            classifier.model_name(),
            label
        )));
    }

    let probability = *probabilities.get(usize::from(label)).ok_or_else(|| {
        MlError::UnexpectedOutput(format!(
            "{}: {} probabilities cannot be indexed by label {}",
            classifier.model_name(),
            probabilities.len(),
            label
        ))
    })?;

    if !(0.0..=1.0).contains(&probability) {
        return Err(MlError::UnexpectedOutput(format!(
            "{}: probability {} outside [0, 1]",
            classifier.model_name(),
            probability
        )));
    }

    Ok(Classification { label, probability })
}

/// 확률을 백분율로 변환하여 소수점 둘째 자리에서 반올림.
pub fn round_percent(probability: f32) -> f64 {
    (f64::from(probability) * 100.0 * 100.0).round() / 100.0
}

/// 예측 서비스.
///
/// 두 분류기는 프로세스 수명 동안 불변이며 모든 요청에서 공유됩니다.
#[derive(Clone)]
pub struct PredictionService {
    basic: Arc<dyn BinaryClassifier>,
    ensemble: Arc<dyn BinaryClassifier>,
}

impl PredictionService {
    /// 로드된 두 분류기로 서비스 생성.
    pub fn new(basic: Arc<dyn BinaryClassifier>, ensemble: Arc<dyn BinaryClassifier>) -> Self {
        Self { basic, ensemble }
    }

    /// 모델 타입에 해당하는 분류기 반환.
    pub fn classifier(&self, model_type: ModelType) -> &Arc<dyn BinaryClassifier> {
        match model_type {
            ModelType::Basic => &self.basic,
            ModelType::Ensemble => &self.ensemble,
        }
    }

    /// 검증된 레코드로 예측 실행.
    ///
    /// 추론은 CPU 작업이므로 `spawn_blocking`으로 blocking thread pool에서 실행합니다.
    pub async fn predict(
        &self,
        record: &PatientRecord,
        model_type: ModelType,
    ) -> Result<PredictionResponse, PredictError> {
        let classifier = Arc::clone(self.classifier(model_type));
        let features = record.to_feature_vector();

        let start = Instant::now();
        let classification =
            tokio::task::spawn_blocking(move || classify(classifier.as_ref(), &features))
                .await
                .map_err(|e| PredictError::Internal(e.to_string()))??;
        record_inference_duration(model_type.as_str(), start.elapsed().as_secs_f64());

        let risk_level = RiskLevel::from_label(classification.label);
        record_prediction(model_type.as_str(), risk_level.as_str());

        debug!(
            model = %model_type,
            label = classification.label,
            probability = classification.probability,
            "Prediction completed"
        );

        Ok(PredictionResponse {
            prediction: classification.label,
            confidence: round_percent(classification.probability),
            risk_level,
            model_used: model_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diabetes_ml::MockClassifier;

    fn features() -> FeatureVector {
        FeatureVector::new(vec![2.0, 130.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0])
    }

    fn record() -> PatientRecord {
        PatientRecord::from_values([2.0, 130.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0])
    }

    fn service() -> PredictionService {
        PredictionService::new(
            Arc::new(MockClassifier::new("basic").with_fixed_output(0, vec![0.8, 0.2])),
            Arc::new(MockClassifier::new("ensemble").with_fixed_output(1, vec![0.1, 0.9])),
        )
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(0.5), 50.0);
        assert_eq!(round_percent(0.0), 0.0);
        assert_eq!(round_percent(1.0), 100.0);
        assert_eq!(round_percent(0.123456), 12.35);
    }

    #[test]
    fn test_classify_reads_probability_of_predicted_class() {
        let classifier = MockClassifier::new("basic").with_fixed_output(1, vec![0.3, 0.7]);
        let result = classify(&classifier, &features()).unwrap();

        assert_eq!(result.label, 1);
        assert!((result.probability - 0.7).abs() < f32::EPSILON);
    }

    /// 결합 호출만 지원하는 분류기 (개별 호출은 실패).
    struct SingleRunClassifier;

    impl BinaryClassifier for SingleRunClassifier {
        fn predict(&self, _: &FeatureVector) -> MlResult<u8> {
            Err(MlError::Inference("separate predict call".to_string()))
        }

        fn predict_proba(&self, _: &FeatureVector) -> MlResult<Vec<f32>> {
            Err(MlError::Inference("separate predict_proba call".to_string()))
        }

        fn model_name(&self) -> &str {
            "single-run"
        }

        fn predict_with_proba(&self, _: &FeatureVector) -> MlResult<(u8, Vec<f32>)> {
            Ok((1, vec![0.35, 0.65]))
        }
    }

    #[test]
    fn test_classify_uses_single_combined_call() {
        let result = classify(&SingleRunClassifier, &features()).unwrap();

        assert_eq!(result.label, 1);
        assert!((result.probability - 0.65).abs() < f32::EPSILON);
    }

    #[test]
    fn test_classify_rejects_non_binary_label() {
        let classifier = MockClassifier::new("basic").with_fixed_output(2, vec![0.1, 0.2, 0.7]);
        assert!(matches!(
            classify(&classifier, &features()),
            Err(MlError::UnexpectedOutput(_))
        ));
    }

    #[test]
    fn test_classify_rejects_short_probability_vector() {
        let classifier = MockClassifier::new("basic").with_fixed_output(1, vec![1.0]);
        assert!(matches!(
            classify(&classifier, &features()),
            Err(MlError::UnexpectedOutput(_))
        ));
    }

    #[test]
    fn test_classify_rejects_out_of_range_probability() {
        let classifier = MockClassifier::new("basic").with_fixed_output(0, vec![1.5, -0.5]);
        assert!(classify(&classifier, &features()).is_err());
    }

    #[tokio::test]
    async fn test_predict_routes_to_selected_model() {
        let service = service();

        let basic = service.predict(&record(), ModelType::Basic).await.unwrap();
        assert_eq!(basic.prediction, 0);
        assert_eq!(basic.confidence, 80.0);
        assert_eq!(basic.risk_level, RiskLevel::Low);
        assert_eq!(basic.model_used, ModelType::Basic);

        let ensemble = service
            .predict(&record(), ModelType::Ensemble)
            .await
            .unwrap();
        assert_eq!(ensemble.prediction, 1);
        assert_eq!(ensemble.confidence, 90.0);
        assert_eq!(ensemble.risk_level, RiskLevel::High);
        assert_eq!(ensemble.model_used, ModelType::Ensemble);
    }

    #[tokio::test]
    async fn test_predict_maps_inference_failure() {
        let service = PredictionService::new(
            Arc::new(MockClassifier::failing("basic", "session crashed")),
            Arc::new(MockClassifier::new("ensemble")),
        );

        let result = service.predict(&record(), ModelType::Basic).await;
        assert!(matches!(result, Err(PredictError::Inference(_))));
    }
}
