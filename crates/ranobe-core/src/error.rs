//! 서비스 계층의 에러 타입.
//!
//! 예상 가능한 도메인 실패(찾을 수 없음, 검증 실패, 충돌 등)는 패닉이나
//! 내부 에러가 아니라 [`ServiceResult`]의 `Err` 값으로 전달됩니다.
//! 데이터베이스 장애 같은 예상치 못한 실패는 이 타입에 포함되지 않으며,
//! API 계층에서 내부 에러로 전파됩니다.
//!
//! `ServiceResult<T>`는 항상 값 또는 에러 중 정확히 하나만 가집니다.
//! 호출자는 `is_err()`로 분기한 뒤 값을 꺼내야 하며, 반대쪽 값을 꺼내는
//! `unwrap()` / `unwrap_err()` 호출은 계약 위반이므로 패닉합니다.

use serde::Serialize;
use thiserror::Error;

/// 검증 실패 항목 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    /// 실패한 필드 이름
    pub property_name: String,
    /// 사람이 읽을 수 있는 실패 사유
    pub message: String,
}

impl FieldFailure {
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
        }
    }
}

/// 검증 실패 목록 (입력 순서 유지).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailures(Vec<FieldFailure>);

impl ValidationFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// 실패 항목을 추가합니다.
    pub fn push(&mut self, property_name: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldFailure::new(property_name, message));
    }

    /// 실패 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldFailure> {
        self.0.iter()
    }

    /// 실패 항목이 있으면 `Err`로, 없으면 `Ok(())`로 변환합니다.
    pub fn into_result(self) -> ServiceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

impl FromIterator<FieldFailure> for ValidationFailures {
    fn from_iter<I: IntoIterator<Item = FieldFailure>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValidationFailures {
    type Item = FieldFailure;
    type IntoIter = std::vec::IntoIter<FieldFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|f| f.property_name.as_str()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// 예상 가능한 서비스 실패.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// 대상을 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 입력 검증 실패
    #[error("검증 실패: {0}")]
    Validation(ValidationFailures),

    /// 현재 상태와 충돌 (예: 팀 소유자 역할 변경 시도)
    #[error("충돌: {0}")]
    Conflict(String),

    /// 이미 존재함
    #[error("이미 존재함: {0}")]
    AlreadyExists(String),

    /// 도메인 규칙상 허용되지 않는 작업
    #[error("권한 없음: {0}")]
    Forbidden(String),

    /// 로그인 정보 불일치
    #[error("로그인 정보가 올바르지 않습니다")]
    InvalidCredentials,
}

/// 서비스 작업을 위한 Result 타입.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// 단일 필드 검증 실패를 생성합니다.
    pub fn invalid_field(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut failures = ValidationFailures::new();
        failures.push(property_name, message);
        Self::Validation(failures)
    }
}
