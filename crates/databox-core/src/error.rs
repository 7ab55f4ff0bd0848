//! Databox 클라이언트 에러 타입.
//!
//! 네트워크 어댑터(`databox-network`)는 `reqwest` 에러를 문자열로 감싸
//! `CoreError::Transport`로 변환한다. 호출자에게는 항상 이 타입 하나만 노출된다.

use thiserror::Error;

/// 디코드 실패 시 에러 메시지에 포함할 응답 본문 최대 길이 (문자 수)
const PREVIEW_MAX_CHARS: usize = 120;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 전송 계층 실패 (URL/요청 생성, 연결 실패, 응답 본문 읽기 실패)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// KPI 페이로드 직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 응답 본문이 기대한 JSON 형태와 다름
    #[error("응답 디코드 실패 ({body_len} bytes): {message} (본문: {preview})")]
    Decode {
        /// 원본 응답 본문 길이 (바이트)
        body_len: usize,
        /// 파서 에러 메시지
        message: String,
        /// 본문 앞부분 (lossy UTF-8)
        preview: String,
    },

    /// 리소스를 찾을 수 없음 (예: 푸시 이력이 비어 있음)
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "LastPush")
        resource_type: String,
        /// 리소스 식별자 또는 조회 경로
        id: String,
    },

    /// 호출자 입력 유효성 검증 실패 (네트워크 호출 전)
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 클라이언트 설정 오류
    #[error("설정 에러: {0}")]
    Config(String),
}

impl CoreError {
    /// 응답 본문과 파서 에러로부터 `Decode` 에러 생성
    pub fn decode(body: &[u8], message: impl Into<String>) -> Self {
        let text = String::from_utf8_lossy(body);
        let mut preview: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
        if text.chars().count() > PREVIEW_MAX_CHARS {
            preview.push('…');
        }

        CoreError::Decode {
            body_len: body.len(),
            message: message.into(),
            preview,
        }
    }
}
