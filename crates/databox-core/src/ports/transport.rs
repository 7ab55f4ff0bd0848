//! 전송 계층 포트.
//!
//! 구현: `databox-network` crate (`HttpTransport`: reqwest, `MemoryTransport`: 테스트용)

use async_trait::async_trait;

use crate::error::CoreError;

/// 인증된 단일 HTTP 호출을 수행하는 전송 계층
///
/// 구현체는 HTTP 상태 코드를 해석하지 않는다. 4xx/5xx 응답이라도
/// 본문을 읽을 수 있으면 그대로 반환하고, 해석은 호출자가 한다.
#[async_trait]
pub trait Transport: Send + Sync {
    /// 요청 대상 기본 호스트 (끝의 `/` 없음)
    fn base_url(&self) -> &str;

    /// 요청 서명에 쓰는 푸시 토큰
    fn token(&self) -> &str;

    /// `base_url + path`로 POST. `payload`는 이미 유효한 JSON bytes여야 한다
    async fn post(&self, path: &str, payload: Vec<u8>) -> Result<Vec<u8>, CoreError>;

    /// `base_url + path`로 GET
    async fn get(&self, path: &str) -> Result<Vec<u8>, CoreError>;
}

/// 요청 경로 검증. 반드시 `/`로 시작해야 한다
pub fn check_path(path: &str) -> Result<(), CoreError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(CoreError::Transport(format!(
            "잘못된 요청 경로 (`/`로 시작해야 함): {path:?}"
        )))
    }
}

/// 푸시 토큰 검증. 공백뿐인 토큰은 `CoreError::Validation`
pub fn check_token(token: &str) -> Result<(), CoreError> {
    if token.trim().is_empty() {
        return Err(CoreError::Validation {
            field: "token".to_string(),
            message: "푸시 토큰이 비어 있음".to_string(),
        });
    }
    Ok(())
}
