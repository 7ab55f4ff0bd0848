//! 푸시 API 응답 모델.
//!
//! 푸시 확인 응답(`ResponseStatus`)과 푸시 이력 엔트리(`LastPush`) 디코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// `null`을 기본값으로 취급하는 역직렬화 헬퍼
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 푸시 확인 응답
///
/// `errors`가 비어 있지 않아도 호출 자체는 성공한 것이다 (부분 실패).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// 서버가 부여한 푸시 ID
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// 반영된 지표 이름 목록
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<String>,
    /// 거부 사유 목록
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

impl ResponseStatus {
    /// 거부된 지표가 없으면 true
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 푸시 이력의 요청 측 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    /// 요청 수신 시각
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// 요청 측 에러 목록
    ///
    /// 에러가 있을 때의 형태가 확인되지 않아 원본 JSON 값으로 보관한다.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<Value>,
    /// 원본 요청 본문
    #[serde(default)]
    pub body: PushRequestBody,
}

/// 푸시 이력에 기록된 요청 본문 (`{"data":[...]}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushRequestBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Map<String, Value>>,
}

/// 푸시 이력의 응답 측 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushResponse {
    /// 응답 시각
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: PushResponseBody,
}

/// 푸시 이력에 기록된 응답 본문
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResponseBody {
    /// 확인 ID (구버전 이력은 `string` 키로 내려준다)
    #[serde(default, alias = "string", deserialize_with = "null_as_default")]
    pub id: String,
}

/// `/lastpushes` 엔드포인트의 단일 이력 엔트리
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastPush {
    #[serde(default)]
    pub request: PushRequest,
    #[serde(default)]
    pub response: PushResponse,
    /// 이 푸시로 영향받은 지표 이름
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<String>,
}

impl LastPush {
    /// 요청 측 에러를 사람이 읽을 수 있는 문자열로 변환
    ///
    /// 문자열 에러는 그대로, 객체 에러는 `message` 필드가 있으면 그 값을,
    /// 없으면 JSON 표현을 사용한다.
    pub fn request_error_messages(&self) -> Vec<String> {
        self.request
            .errors
            .iter()
            .map(|err| match err {
                Value::String(s) => s.clone(),
                Value::Object(obj) => match obj.get("message") {
                    Some(Value::String(msg)) => msg.clone(),
                    _ => err.to_string(),
                },
                other => other.to_string(),
            })
            .collect()
    }

    /// 당시 전송된 와이어 엔트리 목록
    pub fn pushed_data(&self) -> &[Map<String, Value>] {
        &self.request.body.data
    }
}

/// 푸시 확인 응답 디코드
///
/// 최상위 값은 반드시 JSON 객체여야 한다. 빠진 필드는 빈 값이 된다.
pub fn parse_status(body: &[u8]) -> Result<ResponseStatus, CoreError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| CoreError::decode(body, e.to_string()))?;

    if !value.is_object() {
        return Err(CoreError::decode(
            body,
            format!("JSON 객체가 필요하지만 {} 수신", json_kind(&value)),
        ));
    }

    serde_json::from_value(value).map_err(|e| CoreError::decode(body, e.to_string()))
}

/// 푸시 이력 목록 디코드
///
/// 빈 배열은 에러가 아니라 빈 목록이다.
pub fn parse_last_pushes(body: &[u8]) -> Result<Vec<LastPush>, CoreError> {
    serde_json::from_slice(body).map_err(|e| CoreError::decode(body, e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
