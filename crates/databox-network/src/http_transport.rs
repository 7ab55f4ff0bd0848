//! HTTP 전송 계층.
//!
//! `Transport` 포트의 reqwest 구현. 모든 요청에 Basic 인증, Accept/Content-Type,
//! User-Agent 헤더를 붙인다. 재시도는 하지 않는다.

use async_trait::async_trait;
use databox_core::config::ClientConfig;
use databox_core::error::CoreError;
use databox_core::ports::transport::{check_path, check_token, Transport};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use tracing::{debug, warn};

/// 푸시 API v2 미디어 타입
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.databox.v2+json";

/// 요청 본문 Content-Type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 내장 User-Agent (클라이언트 이름, 버전, 런타임)
pub fn default_user_agent() -> String {
    format!(
        "Databox/{} (rust; {}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// reqwest 기반 `Transport` 구현
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
    user_agent: String,
}

impl HttpTransport {
    /// 새 HTTP 전송 계층 생성
    ///
    /// 네트워크 호출은 하지 않는다. 빈 토큰은 `CoreError::Validation`,
    /// 설정 검증 실패는 `CoreError::Config`.
    pub fn new(token: &str, config: &ClientConfig) -> Result<Self, CoreError> {
        check_token(token)?;
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout_duration() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout_duration() {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CoreError::Transport(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: config.normalized_host().to_string(),
            token: token.to_string(),
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }

    /// 인증/협상 헤더가 포함된 요청 빌더 반환
    fn signed_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, CoreError> {
        check_path(path)?;

        let raw = format!("{}{}", self.base_url, path);
        let url = reqwest::Url::parse(&raw)
            .map_err(|e| CoreError::Transport(format!("잘못된 요청 URL ({raw}): {e}")))?;

        Ok(self
            .client
            .request(method, url)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, ACCEPT_MEDIA_TYPE)
            .basic_auth(&self.token, Some("")))
    }

    /// 요청 전송 후 본문 bytes 반환
    ///
    /// 상태 코드는 해석하지 않는다. 비정상 상태는 로그만 남기고 본문을 그대로 돌려준다.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<Vec<u8>, CoreError> {
        let resp = request
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("{method} {path} 요청 실패: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Transport(format!("{method} {path} 응답 본문 읽기 실패: {e}")))?;

        if status.is_success() {
            debug!("{method} {path} → {status}, {} bytes", body.len());
        } else {
            warn!("{method} {path} → 비정상 상태 {status}, {} bytes", body.len());
        }

        Ok(body.to_vec())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn token(&self) -> &str {
        &self.token
    }

    async fn post(&self, path: &str, payload: Vec<u8>) -> Result<Vec<u8>, CoreError> {
        debug!("POST {}{path}: {} bytes", self.base_url, payload.len());
        let req = self.signed_request(Method::POST, path)?.body(payload);
        self.execute(req, &Method::POST, path).await
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, CoreError> {
        debug!("GET {}{path}", self.base_url);
        let req = self.signed_request(Method::GET, path)?;
        self.execute(req, &Method::GET, path).await
    }
}
