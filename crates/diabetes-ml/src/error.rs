//! ML 모듈 에러 타입.

use thiserror::Error;

/// 분류기 로드 및 추론에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum MlError {
    /// 모델 아티팩트 로드 에러
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// 모델 추론 중 에러
    #[error("Inference error: {0}")]
    Inference(String),

    /// 유효하지 않은 입력 데이터
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 모델 출력이 이진 분류 계약을 벗어남
    #[error("Unexpected model output: {0}")]
    UnexpectedOutput(String),

    /// ONNX Runtime 에러
    #[error("ONNX runtime error: {0}")]
    OnnxRuntime(String),
}

/// ML 작업을 위한 Result 타입.
pub type MlResult<T> = Result<T, MlError>;

// ONNX Runtime 에러로부터 변환
impl From<ort::Error> for MlError {
    fn from(err: ort::Error) -> Self {
        MlError::OnnxRuntime(err.to_string())
    }
}
