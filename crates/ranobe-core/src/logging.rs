//! tracing 기반 로깅 초기화.
//!
//! 설정 파일의 `[logging]` 섹션에서 시작하고, `RUST_LOG`와 `LOG_FORMAT`
//! 환경 변수가 있으면 그 값을 우선합니다.
//!
//! 출력 형식:
//! - `pretty`: 개발용 여러 줄 형식
//! - `json`: 로그 수집기용 JSON 한 줄 형식
//! - `compact`: 간결한 한 줄 형식

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("알 수 없는 로그 형식: {}", other)),
        }
    }
}

/// 로깅 초기화 옵션.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` 지시어 (예: "info", "ranobe_api=debug,tower_http=info")
    pub filter: String,
    pub format: LogFormat,
    /// span 진입/종료 이벤트 기록
    pub span_events: bool,
    /// 파일명과 줄 번호 기록
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            span_events: false,
            source_location: true,
        }
    }
}

impl LogConfig {
    /// 설정 파일의 `[logging]` 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식은 `Pretty`로 대체됩니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            filter: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// `RUST_LOG` / `LOG_FORMAT` 환경 변수로 덮어씁니다.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_FORMAT").ok(),
        )
    }

    fn with_overrides(mut self, filter: Option<String>, format: Option<String>) -> Self {
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            self.filter = filter;
        }
        if let Some(format) = format.and_then(|f| f.parse().ok()) {
            self.format = format;
        }
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let base = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base.json().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// 전역 tracing 구독자를 설치합니다.
///
/// 이미 설치되어 있으면 에러를 반환합니다.
///
/// ```no_run
/// use ranobe_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let mut config = LogConfig::default().with_env_overrides();
/// config.format = LogFormat::Json;
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.filter)?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()?;

    tracing::info!(format = ?config.format, filter = %config.filter, "Logging initialized");
    Ok(())
}
