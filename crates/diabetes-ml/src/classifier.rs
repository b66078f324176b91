//! 이진 분류기 capability와 테스트용 mock 구현.

use crate::{FeatureVector, MlError, MlResult, FEATURE_COUNT};

/// 다형성을 가능하게 하는 이진 분류기 trait.
///
/// 구현체는 로드 이후 불변이어야 하며, 여러 요청에서 동시에 호출될 수 있습니다.
pub trait BinaryClassifier: Send + Sync {
    /// feature에서 클래스 레이블(0 또는 1) 예측.
    fn predict(&self, features: &FeatureVector) -> MlResult<u8>;

    /// 클래스별 확률 추정. 인덱스가 레이블과 일치합니다: `[P(0), P(1)]`.
    fn predict_proba(&self, features: &FeatureVector) -> MlResult<Vec<f32>>;

    /// 모델 이름 반환.
    fn model_name(&self) -> &str;

    /// 레이블과 클래스별 확률을 함께 반환.
    ///
    /// 기본 구현은 `predict`와 `predict_proba`를 차례로 호출합니다.
    /// 한 번의 실행으로 두 값을 모두 얻는 구현체는 이 메서드를 재정의합니다.
    fn predict_with_proba(&self, features: &FeatureVector) -> MlResult<(u8, Vec<f32>)> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }
}

/// mock 분류기 동작 방식.
#[derive(Debug, Clone)]
enum MockBehavior {
    /// glucose/bmi 기반 로지스틱 휴리스틱
    Heuristic,
    /// 항상 같은 출력 반환 (계약 위반 출력 포함 가능)
    Fixed { label: u8, probabilities: Vec<f32> },
    /// 항상 추론 에러 반환
    Failing(String),
}

/// 실제 모델 파일 없이 테스트하기 위한 mock 분류기.
///
/// 기본 동작은 결정적입니다: 같은 입력이면 항상 같은 레이블과 확률을 반환합니다.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    name: String,
    behavior: MockBehavior,
}

impl MockClassifier {
    /// 휴리스틱 mock 분류기 생성.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: MockBehavior::Heuristic,
        }
    }

    /// 항상 고정된 레이블과 확률을 반환하도록 설정.
    pub fn with_fixed_output(mut self, label: u8, probabilities: Vec<f32>) -> Self {
        self.behavior = MockBehavior::Fixed {
            label,
            probabilities,
        };
        self
    }

    /// 항상 추론 에러를 반환하는 mock 분류기 생성.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: MockBehavior::Failing(message.into()),
        }
    }

    /// 양성 클래스 확률 계산.
    ///
    /// glucose(인덱스 1)와 bmi(인덱스 5)만 사용하는 단순 로지스틱 점수.
    fn positive_probability(features: &FeatureVector) -> MlResult<f32> {
        let values = features.as_slice();
        if values.len() != FEATURE_COUNT {
            return Err(MlError::InvalidInput(format!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                values.len()
            )));
        }

        let z = (values[1] - 140.0) / 20.0 + (values[5] - 30.0) / 10.0;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl BinaryClassifier for MockClassifier {
    fn predict(&self, features: &FeatureVector) -> MlResult<u8> {
        match &self.behavior {
            MockBehavior::Heuristic => {
                let p1 = Self::positive_probability(features)?;
                Ok(u8::from(p1 >= 0.5))
            }
            MockBehavior::Fixed { label, .. } => Ok(*label),
            MockBehavior::Failing(message) => Err(MlError::Inference(message.clone())),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> MlResult<Vec<f32>> {
        match &self.behavior {
            MockBehavior::Heuristic => {
                let p1 = Self::positive_probability(features)?;
                Ok(vec![1.0 - p1, p1])
            }
            MockBehavior::Fixed { probabilities, .. } => Ok(probabilities.clone()),
            MockBehavior::Failing(message) => Err(MlError::Inference(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
