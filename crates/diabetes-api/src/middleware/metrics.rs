//! HTTP 요청 metrics middleware.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{normalize_path, record_http_exchange};

/// 메트릭 path 라벨.
///
/// 라우터가 매칭한 경로 템플릿을 우선 사용하고, 매칭되지 않은 요청(404 등)은
/// `normalize_path`로 묶습니다.
fn path_label(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    }
}

/// 요청 처리 시간과 응답 상태를 기록하는 미들웨어.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = path_label(&request);

    let start = Instant::now();
    let response = next.run(request).await;

    record_http_exchange(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    async fn label_handler(request: Request) -> String {
        path_label(&request)
    }

    async fn read_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_label_uses_route_template() {
        let app = Router::new().nest("/health", Router::new().route("/ready", get(label_handler)));

        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(read_text(response).await, "/health/ready");
    }

    #[test]
    fn test_label_for_unmatched_request() {
        let request = Request::builder()
            .uri("/wp-admin/login.php")
            .body(Body::empty())
            .unwrap();

        assert_eq!(path_label(&request), "/other");
    }

    #[tokio::test]
    async fn test_middleware_passes_response_through() {
        let app = Router::new()
            .route("/predict", post(|| async { (StatusCode::BAD_REQUEST, "rejected") }))
            .layer(middleware::from_fn(metrics_layer));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_text(response).await, "rejected");
    }

    #[tokio::test]
    async fn test_middleware_on_unknown_route() {
        let app = Router::new()
            .route("/", get(|| async { "OK" }))
            .layer(middleware::from_fn(metrics_layer));

        let response = app
            .oneshot(Request::builder().uri("/does-not-exist").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
