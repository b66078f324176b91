//! 당뇨병 위험 예측을 위한 이진 분류기.
//!
//! 이 크레이트는 예측 서비스가 사용하는 추론 계층을 제공합니다:
//!
//! - **Feature Vector**: 고정 순서 8개 입력 값
//! - **BinaryClassifier**: 레이블 분류 + 클래스별 확률 추정 capability
//! - **OnnxClassifier**: ONNX Runtime 기반 분류기 (scikit-learn → skl2onnx 내보내기)
//! - **MockClassifier**: 모델 파일 없이 테스트하기 위한 결정적 분류기
//!
//! # 아키텍처
//!
//! ```text
//! PatientRecord (API)
//!        │
//!        ▼
//! ┌─────────────────┐
//! │  FeatureVector  │ ← [pregnancies .. age] (f32 x 8)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌──────────────────────────┐
//! │ dyn BinaryClassifier     │
//! │  predict / predict_proba │
//! │  predict_with_proba      │
//! └──────────────────────────┘
//! ```
//!
//! # 예제
//!
//! ```
//! use diabetes_ml::{BinaryClassifier, FeatureVector, MockClassifier};
//!
//! let classifier = MockClassifier::new("basic");
//! let features = FeatureVector::new(vec![2.0, 130.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0]);
//!
//! let label = classifier.predict(&features).unwrap();
//! let probabilities = classifier.predict_proba(&features).unwrap();
//! assert!(label <= 1);
//! assert_eq!(probabilities.len(), 2);
//! ```

pub mod classifier;
pub mod error;
pub mod onnx;
pub mod types;

// 자주 사용되는 타입 재내보내기
pub use classifier::{BinaryClassifier, MockClassifier};
pub use error::{MlError, MlResult};
pub use onnx::{ClassifierConfig, OnnxClassifier};
pub use types::{FeatureVector, FEATURE_COUNT};
