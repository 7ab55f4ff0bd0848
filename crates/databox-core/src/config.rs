//! 클라이언트 설정 구조체.
//!
//! 푸시 호스트, 요청 타임아웃, User-Agent 재정의 등을 정의한다.
//! 라이브러리는 파일이나 환경변수를 직접 읽지 않으며,
//! 임베딩 애플리케이션이 자체 설정 파일에서 역직렬화해 넘길 수 있다.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;

/// 운영 환경 푸시 엔드포인트
pub const DEFAULT_PUSH_HOST: &str = "https://push2new.databox.com";

/// 푸시 클라이언트 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 푸시 API 기본 호스트 (경로 없이, 끝의 `/`는 제거됨)
    #[serde(default = "default_host")]
    pub host: String,
    /// 요청 전체 타임아웃 (밀리초). `None`이면 HTTP 스택 기본값
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// 연결 수립 타임아웃 (밀리초)
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    /// User-Agent 재정의. `None`이면 내장 식별자 사용
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_host() -> String {
    DEFAULT_PUSH_HOST.to_string()
}

/// `Duration` → 밀리초. 1ms 미만의 0이 아닌 값은 1로 올리고, 범위를 넘으면 `u64::MAX`
fn duration_to_ms(duration: Duration) -> u64 {
    if duration.is_zero() {
        return 0;
    }
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            request_timeout_ms: None,
            connect_timeout_ms: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// 지정한 호스트로 설정 생성 (나머지는 기본값)
    pub fn with_host(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// 요청 타임아웃 설정
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(duration_to_ms(timeout));
        self
    }

    /// 연결 타임아웃 설정
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_to_ms(timeout));
        self
    }

    /// 요청 타임아웃 (`Duration`)
    pub fn request_timeout_duration(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// 연결 타임아웃 (`Duration`)
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    /// 끝의 `/`를 제거한 호스트
    pub fn normalized_host(&self) -> &str {
        self.host.trim_end_matches('/')
    }

    /// 설정값 검증
    ///
    /// 호스트는 http/https 절대 URL이어야 하고, 타임아웃은 0이 아니어야 한다.
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = Url::parse(self.normalized_host())
            .map_err(|e| CoreError::Config(format!("호스트 URL 파싱 실패 ({}): {e}", self.host)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "지원하지 않는 스킴: {}",
                url.scheme()
            )));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(CoreError::Config(format!(
                "호스트에 쿼리/프래그먼트 불가: {}",
                self.host
            )));
        }

        if self.request_timeout_ms == Some(0) {
            return Err(CoreError::Config(
                "request_timeout_ms는 0보다 커야 함".to_string(),
            ));
        }
        if self.connect_timeout_ms == Some(0) {
            return Err(CoreError::Config(
                "connect_timeout_ms는 0보다 커야 함".to_string(),
            ));
        }

        Ok(())
    }
}
