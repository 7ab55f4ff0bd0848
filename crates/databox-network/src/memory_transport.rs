//! 메모리 전송 계층.
//!
//! 네트워크 없이 `DataboxClient`를 구동하기 위한 `Transport` 구현.
//! 보낸 요청을 모두 기록하고, 미리 넣어 둔 응답을 FIFO 순서로 돌려준다.

use std::collections::VecDeque;

use async_trait::async_trait;
use databox_core::error::CoreError;
use databox_core::ports::transport::{check_path, Transport};
use parking_lot::Mutex;
use serde_json::Value;

/// 메모리 전송 계층의 가짜 기본 호스트
pub const MEMORY_BASE_URL: &str = "memory://databox";

/// 메모리 전송 계층의 기본 푸시 토큰
pub const MEMORY_TOKEN: &str = "memory-token";

/// 기록된 요청의 HTTP 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// 기록된 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: RequestMethod,
    pub path: String,
    /// POST 본문 (GET은 `None`)
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// 본문을 JSON으로 파싱 (본문이 없거나 JSON이 아니면 `None`)
    pub fn body_json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[derive(Debug)]
enum Reply {
    Body(Vec<u8>),
    Fail(String),
}

/// 메모리 `Transport` 구현
#[derive(Debug)]
pub struct MemoryTransport {
    token: String,
    default_body: Vec<u8>,
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// 대기 응답이 없을 때 `{}`를 돌려주는 전송 계층
    pub fn new() -> Self {
        Self::with_default_body(b"{}".to_vec())
    }

    /// 대기 응답이 없을 때 돌려줄 본문 지정
    pub fn with_default_body(body: impl Into<Vec<u8>>) -> Self {
        Self {
            token: MEMORY_TOKEN.to_string(),
            default_body: body.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 푸시 토큰 지정
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// 응답 본문 하나를 대기열에 추가
    pub fn respond_with(&self, body: impl Into<Vec<u8>>) -> &Self {
        self.replies.lock().push_back(Reply::Body(body.into()));
        self
    }

    /// JSON 응답 하나를 대기열에 추가
    pub fn respond_json(&self, value: &Value) -> &Self {
        self.respond_with(value.to_string())
    }

    /// 전송 실패 하나를 대기열에 추가
    pub fn fail_with(&self, message: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Reply::Fail(message.into()));
        self
    }

    /// 지금까지 기록된 요청 (전송 순서)
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// 마지막 요청
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// 아직 소비되지 않은 대기 응답 수
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }

    fn exchange(&self, request: RecordedRequest) -> Result<Vec<u8>, CoreError> {
        check_path(&request.path)?;
        self.requests.lock().push(request);

        match self.replies.lock().pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(message)) => Err(CoreError::Transport(message)),
            None => Ok(self.default_body.clone()),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn base_url(&self) -> &str {
        MEMORY_BASE_URL
    }

    fn token(&self) -> &str {
        &self.token
    }

    async fn post(&self, path: &str, payload: Vec<u8>) -> Result<Vec<u8>, CoreError> {
        self.exchange(RecordedRequest {
            method: RequestMethod::Post,
            path: path.to_string(),
            body: Some(payload),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, CoreError> {
        self.exchange(RecordedRequest {
            method: RequestMethod::Get,
            path: path.to_string(),
            body: None,
        })
    }
}
