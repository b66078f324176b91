//! ML 모듈의 공통 타입.

use serde::{Deserialize, Serialize};

/// 분류기가 기대하는 입력 feature 개수.
///
/// 순서: pregnancies, glucose, bloodPressure, skinThickness, insulin, bmi,
/// diabetesPedigreeFunction, age
pub const FEATURE_COUNT: usize = 8;

/// 분류기 입력을 위한 feature vector.
///
/// 값 범위는 검증하지 않습니다. 음수나 생물학적으로 불가능한 값도 그대로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// feature 값들
    values: Vec<f32>,
}

impl FeatureVector {
    /// 값으로부터 새 feature vector 생성.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// f64 값 배열에서 생성 (API 레코드 → 모델 입력).
    pub fn from_f64(values: &[f64]) -> Self {
        Self {
            values: values.iter().map(|v| *v as f32).collect(),
        }
    }

    /// feature 값을 슬라이스로 반환.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// feature 개수 반환.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// feature vector가 비어있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
