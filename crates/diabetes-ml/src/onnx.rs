//! ONNX Runtime 기반 이진 분류기.
//!
//! 모델은 별도로 학습되어야 하며 (예: scikit-learn) `skl2onnx`로
//! `zipmap` 옵션을 끈 상태로 내보내야 합니다. 내보낸 그래프는 다음을 가집니다:
//! - 입력: [batch_size, 8] 형태의 float32 텐서
//! - 출력 `label`: [batch_size] 형태의 int64 텐서
//! - 출력 `probabilities`: [batch_size, 2] 형태의 float32 텐서

use crate::classifier::BinaryClassifier;
use crate::{FeatureVector, MlError, MlResult, FEATURE_COUNT};
use ort::session::Session;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// ONNX 분류기 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// ONNX 모델 파일 경로
    pub model_path: PathBuf,
    /// 로깅/식별을 위한 모델 이름
    pub model_name: String,
    /// 입력 텐서 이름
    pub input_name: String,
    /// 레이블 출력 텐서 이름
    pub label_output: String,
    /// 확률 출력 텐서 이름
    pub probability_output: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/model.onnx"),
            model_name: "basic".to_string(),
            input_name: "float_input".to_string(),
            label_output: "label".to_string(),
            probability_output: "probabilities".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// 주어진 모델 경로로 새 분류기 설정 생성.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// 모델 이름 설정.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// 입력 텐서 이름 설정.
    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = name.into();
        self
    }
}

/// ONNX 기반 이진 분류기.
///
/// ONNX Runtime 세션 실행에는 배타적 접근이 필요하므로 세션을 mutex로 감쌉니다.
/// 잠금은 단일 추론 실행 동안만 유지됩니다.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    config: ClassifierConfig,
}

impl OnnxClassifier {
    /// 지정된 경로에서 ONNX 모델 로드.
    ///
    /// 파일이 없거나 ONNX 그래프로 읽을 수 없으면 `MlError::ModelLoad`를 반환합니다.
    pub fn load(config: ClassifierConfig) -> MlResult<Self> {
        let path = &config.model_path;

        if !path.exists() {
            return Err(MlError::ModelLoad(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        info!(model = %config.model_name, path = %path.display(), "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| MlError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| MlError::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| {
                MlError::ModelLoad(format!("Failed to load model {}: {}", path.display(), e))
            })?;

        info!(model = %config.model_name, "ONNX model loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            config,
        })
    }

    /// 세션을 한 번 실행하여 레이블과 확률을 함께 추출.
    fn run(&self, features: &FeatureVector) -> MlResult<(i64, Vec<f32>)> {
        if features.len() != FEATURE_COUNT {
            return Err(MlError::InvalidInput(format!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            )));
        }

        // 입력 텐서 생성 [1, 8]
        let input_data: Vec<f32> = features.as_slice().to_vec();
        let input_shape = [1i64, FEATURE_COUNT as i64];
        let input_tensor =
            ort::value::Tensor::from_array((input_shape, input_data.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| MlError::Inference("ONNX session lock poisoned".to_string()))?;

        let outputs = session.run(ort::inputs![self.config.input_name.as_str() => input_tensor])?;

        let label_output = self.config.label_output.as_str();
        let (_, labels) =
            named_output(outputs.get(label_output), label_output)?.try_extract_tensor::<i64>()?;
        let label = first_label(labels)?;

        let proba_output = self.config.probability_output.as_str();
        let (_, probs) =
            named_output(outputs.get(proba_output), proba_output)?.try_extract_tensor::<f32>()?;
        let probabilities = first_row(probs)?;

        debug!(
            model = %self.config.model_name,
            label,
            ?probabilities,
            "ONNX inference completed"
        );

        Ok((label, probabilities))
    }
}

/// 이름으로 찾은 세션 출력 검증.
fn named_output<T>(output: Option<T>, name: &str) -> MlResult<T> {
    output.ok_or_else(|| MlError::UnexpectedOutput(format!("Missing output '{}'", name)))
}

/// 배치 크기 1 레이블 텐서에서 레이블 추출.
fn first_label(labels: &[i64]) -> MlResult<i64> {
    labels
        .first()
        .copied()
        .ok_or_else(|| MlError::UnexpectedOutput("Empty label tensor".to_string()))
}

/// 배치 크기 1 확률 텐서의 첫 행 (전체 슬라이스).
fn first_row(probabilities: &[f32]) -> MlResult<Vec<f32>> {
    if probabilities.is_empty() {
        return Err(MlError::UnexpectedOutput("Empty probability tensor".to_string()));
    }
    Ok(probabilities.to_vec())
}

fn to_binary_label(label: i64) -> MlResult<u8> {
    u8::try_from(label)
        .map_err(|_| MlError::UnexpectedOutput(format!("Label out of range: {}", label)))
}

impl BinaryClassifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> MlResult<u8> {
        let (label, _) = self.run(features)?;
        to_binary_label(label)
    }

    fn predict_proba(&self, features: &FeatureVector) -> MlResult<Vec<f32>> {
        Ok(self.run(features)?.1)
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn predict_with_proba(&self, features: &FeatureVector) -> MlResult<(u8, Vec<f32>)> {
        let (label, probabilities) = self.run(features)?;
        Ok((to_binary_label(label)?, probabilities))
    }
}
