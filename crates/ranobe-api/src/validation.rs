//! 요청 본문 검증.
//!
//! [`ValidatedJson`]은 JSON 역직렬화 후 `validator` 규칙을 적용하며,
//! 실패하면 `ServiceError::Validation`으로 변환되어 400 응답이 됩니다.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use ranobe_core::{FieldFailure, ServiceError, ValidationFailures};

use crate::error::ApiError;

/// `validator` 에러를 필드 이름 순으로 정렬된 실패 목록으로 변환합니다.
///
/// 요청 DTO는 `camelCase`로 역직렬화되므로 필드 이름도 JSON 이름으로 보고합니다.
pub fn to_failures(errors: &ValidationErrors) -> ValidationFailures {
    let mut fields: Vec<_> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (json_field_name(&field), errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("유효하지 않은 값 ({})", e.code));
                FieldFailure::new(field.clone(), message)
            })
        })
        .collect()
}

/// `refresh_token` -> `refreshToken`
fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;

    for c in field.chars() {
        if c == '_' {
            upper_next = !name.is_empty();
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// 검증된 JSON 요청 본문 추출기.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ServiceError::invalid_field("body", rejection.body_text())
            })?;

        value
            .validate()
            .map_err(|errors| ServiceError::Validation(to_failures(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
