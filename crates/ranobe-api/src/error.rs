//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! | 에러 | 상태 코드 |
//! |---|---|
//! | 검증 실패 | 400 + `validationErrors` |
//! | 로그인 정보 불일치 | 401 |
//! | 권한 없음 | 403 |
//! | 찾을 수 없음 | 404 |
//! | 충돌 / 이미 존재 | 409 |
//! | 내부 에러 | 500 (상세 내용은 로그에만 기록) |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use ranobe_core::{FieldFailure, ServiceError};

use crate::auth::{PasswordError, TokenError};
use crate::repository::RepositoryError;

/// 내부 에러 응답에 사용하는 고정 메시지.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 통합 API 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "errorMessage": "검증 실패: name, description",
///   "validationErrors": [
///     { "propertyName": "name", "message": "필수 항목입니다" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error_message: String,
    /// 검증 실패 항목 (검증 에러일 때만 포함)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationErrorEntry>>,
}

/// 검증 실패 응답 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorEntry {
    pub property_name: String,
    pub message: String,
}

impl From<FieldFailure> for ValidationErrorEntry {
    fn from(f: FieldFailure) -> Self {
        Self {
            property_name: f.property_name,
            message: f.message,
        }
    }
}

impl ApiErrorResponse {
    /// 메시지만 있는 에러 생성.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            validation_errors: None,
        }
    }

    /// 검증 실패 항목을 포함한 에러 생성.
    pub fn validation(
        message: impl Into<String>,
        entries: impl IntoIterator<Item = FieldFailure>,
    ) -> Self {
        Self {
            error_message: message.into(),
            validation_errors: Some(entries.into_iter().map(Into::into).collect()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error_message)
    }
}

/// 핸들러/서비스에서 전파되는 API 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 예상 가능한 서비스 실패
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// 예상치 못한 내부 에러 (DB 장애, 설정 오류 등)
    #[error("내부 에러: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 임의의 에러를 내부 에러로 감쌉니다.
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(e) => service_status(e),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) | ServiceError::AlreadyExists(_) => StatusCode::CONFLICT,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Service(ServiceError::Validation(failures)) => {
                ApiErrorResponse::validation(format!("검증 실패: {}", failures), failures)
            }
            ApiError::Service(e) => ApiErrorResponse::new(e.to_string()),
            ApiError::Internal(e) => {
                // 내부 상세 정보는 응답에 포함하지 않음
                error!(error = %format!("{:#}", e), "Unhandled internal error");
                ApiErrorResponse::new(INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranobe_core::ValidationFailures;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_service_error_status_mapping() {
        let cases = vec![
            (ServiceError::not_found("book"), StatusCode::NOT_FOUND),
            (ServiceError::conflict("owner"), StatusCode::CONFLICT),
            (ServiceError::already_exists("team"), StatusCode::CONFLICT),
            (ServiceError::forbidden("team"), StatusCode::FORBIDDEN),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::invalid_field("name", "required"), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_validation_response_body() {
        let mut failures = ValidationFailures::new();
        failures.push("name", "필수 항목입니다");
        failures.push("description", "1000자 이하여야 합니다");

        let response = ApiError::from(ServiceError::Validation(failures)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let entries = json["validationErrors"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["propertyName"], "name");
        assert_eq!(entries[1]["propertyName"], "description");
        assert!(json["errorMessage"].is_string());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = ApiError::internal(anyhow::anyhow!("connection refused: db.internal:5432"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["errorMessage"], INTERNAL_ERROR_MESSAGE);
        assert!(json.get("validationErrors").is_none());
        assert!(!json.to_string().contains("db.internal"));
    }

    #[tokio::test]
    async fn test_not_found_message() {
        let response = ApiError::from(ServiceError::not_found("팀 3")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["errorMessage"], "찾을 수 없음: 팀 3");
    }

    #[test]
    fn test_json_serialization_simple() {
        let error = ApiErrorResponse::new("Resource not found");
        let json = serde_json::to_string(&error).unwrap();

        assert_eq!(json, r#"{"errorMessage":"Resource not found"}"#);
    }
}
