//! 환경변수 기반 서버 설정.
//!
//! `.env` 파일이 있으면 `dotenvy`로 먼저 로드한 뒤 환경변수를 읽습니다.
//! 설정되지 않은 값은 기본값을 사용합니다.
//!
//! # 환경변수
//!
//! - `API_HOST`: 바인딩할 호스트 (기본값: `127.0.0.1`)
//! - `API_PORT`: 바인딩할 포트 (기본값: `5000`)
//! - `BASIC_MODEL_PATH`: basic 분류기 ONNX 파일 (기본값: `models/model.onnx`)
//! - `ENSEMBLE_MODEL_PATH`: ensemble 분류기 ONNX 파일
//!   (기본값: `models/diabetes_ensemble_model.onnx`)
//! - `MODEL_INPUT_NAME`: ONNX 입력 텐서 이름 (기본값: `float_input`)
//! - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록 (미설정 시 모든 origin 허용)

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// 설정 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `host:port` 조합이 유효한 소켓 주소가 아님
    #[error("Invalid socket address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// 서버 설정 구조체.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
    /// basic 분류기 모델 경로
    pub basic_model_path: PathBuf,
    /// ensemble 분류기 모델 경로
    pub ensemble_model_path: PathBuf,
    /// ONNX 입력 텐서 이름
    pub model_input_name: String,
    /// 허용 CORS origin 목록 (None이면 모든 origin 허용)
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            basic_model_path: PathBuf::from("models/model.onnx"),
            ensemble_model_path: PathBuf::from("models/diabetes_ensemble_model.onnx"),
            model_input_name: "float_input".to_string(),
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수에서 설정 로드.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "API_PORT", defaults.port),
            basic_model_path: lookup("BASIC_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.basic_model_path),
            ensemble_model_path: lookup("ENSEMBLE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ensemble_model_path),
            model_input_name: lookup("MODEL_INPUT_NAME").unwrap_or(defaults.model_input_name),
            cors_origins,
        }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `ConfigError::InvalidAddress`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}

/// 값을 파싱 (실패 시 기본값 사용)
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
