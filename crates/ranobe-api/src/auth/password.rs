//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.
//! 비밀번호 불일치는 에러가 아니라 `Ok(false)`이며,
//! 저장된 해시가 손상된 경우만 에러로 취급합니다.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 존재하지 않는 사용자 검증에 쓰는 고정 비밀번호.
const PLACEHOLDER_PASSWORD: &str = "ranobe-placeholder-credential";

static PLACEHOLDER_HASH: OnceLock<String> = OnceLock::new();

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패: {0}")]
    HashingFailed(String),
    #[error("저장된 해시 형식이 올바르지 않습니다: {0}")]
    InvalidHashFormat(String),
}

/// 비밀번호 해싱.
///
/// 솔트는 자동으로 생성되며 PHC 형식 문자열을 반환합니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// 비밀번호 검증.
///
/// # Returns
///
/// 일치하면 `Ok(true)`, 불일치하면 `Ok(false)`
///
/// # Errors
///
/// 저장된 해시를 파싱할 수 없으면 `PasswordError::InvalidHashFormat`
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::InvalidHashFormat(e.to_string())),
    }
}

/// 사용자 인증 정보 검증.
///
/// 저장된 해시가 없으면 고정 해시로 같은 비용의 검증을 수행한 뒤
/// 항상 `Ok(false)`를 반환합니다. Argon2 연산이므로 blocking 스레드에서 호출해야 합니다.
pub fn verify_credentials(password: &str, stored_hash: Option<&str>) -> Result<bool, PasswordError> {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, placeholder_hash()?)?;
            Ok(false)
        }
    }
}

fn placeholder_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = PLACEHOLDER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(PLACEHOLDER_PASSWORD)?;
    Ok(PLACEHOLDER_HASH.get_or_init(|| hash))
}
