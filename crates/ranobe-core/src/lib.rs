//! # Ranobe Core
//!
//! 웹소설 번역 플랫폼의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! 이 크레이트는 API 서버 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 역할 및 인증된 식별 정보
//! - Refresh 세션 수명 정책
//! - 팀 멤버십과 소유자 규칙
//! - 서비스 계층 에러 타입 (`ServiceResult`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
