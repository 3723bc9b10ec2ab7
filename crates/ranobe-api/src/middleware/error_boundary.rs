//! 요청 로깅 및 패닉 처리.
//!
//! 모든 요청의 시작/종료를 처리 시간과 함께 기록하고,
//! 핸들러 패닉은 상세 정보 없이 고정된 500 응답으로 변환합니다.

use std::any::Any;
use std::time::Instant;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use crate::error::{ApiErrorResponse, INTERNAL_ERROR_MESSAGE};

/// 요청 시작/종료를 기록하는 미들웨어.
///
/// 5xx 응답은 error, 4xx 응답은 warn 레벨로 기록합니다.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    info!(%method, %path, "Request started");

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        error!(%method, %path, status, latency_ms, "Request failed");
    } else if response.status().is_client_error() {
        warn!(%method, %path, status, latency_ms, "Request rejected");
    } else {
        info!(%method, %path, status, latency_ms, "Request completed");
    }

    response
}

/// `CatchPanicLayer`용 패닉 응답 생성기.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
