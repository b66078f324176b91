//! CORS 미들웨어 구성.

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;

/// CORS 미들웨어 구성.
///
/// `CORS_ORIGINS`가 설정되어 있으면 해당 origin만, 정해진 method/header로 허용합니다.
/// 설정되지 않으면 origin, method, header 모두 제한하지 않습니다.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .flatten()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        if config.cors_origins.is_some() {
            warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS configured with {} allowed origins", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}
