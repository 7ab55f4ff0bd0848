//! KPI 모델.
//!
//! 단일 지표 샘플(`Kpi`)과 푸시 API 와이어 페이로드(`{"data":[...]}`) 변환 규칙.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::CoreError;

/// 와이어 엔트리에서 날짜를 담는 예약 키
pub const DATE_KEY: &str = "date";

/// 와이어 엔트리에서 지표 키 앞에 붙는 접두사
pub const KEY_PREFIX: char = '$';

/// 단일 KPI 샘플
///
/// 호출자가 생성하고 클라이언트는 읽기만 한다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpi {
    /// 지표 키 (예: "temp.ny"). 비어 있으면 안 됨
    pub key: String,
    /// 측정값
    pub value: f32,
    /// 측정 시각 문자열 (ISO-8601 계열). `None` 또는 빈 문자열이면 서버 수신 시각 사용
    pub date: Option<String>,
    /// 추가 속성. 엔트리 최상위에 병합된다
    pub attributes: HashMap<String, Value>,
}

impl Kpi {
    /// 키와 값으로 KPI 생성
    pub fn new(key: impl Into<String>, value: f32) -> Self {
        Self {
            key: key.into(),
            value,
            date: None,
            attributes: HashMap::new(),
        }
    }

    /// 날짜 문자열 지정
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// UTC 시각을 RFC 3339(초 단위, `Z` 접미사)로 지정
    pub fn with_datetime(self, at: DateTime<Utc>) -> Self {
        self.with_date(at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// 속성 하나 추가 (같은 이름은 덮어씀)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// 와이어 엔트리의 값 키 (`"$" + key`)
    pub fn wire_key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.key)
    }

    /// 푸시 전 입력 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.key.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "key".to_string(),
                message: "KPI 키가 비어 있음".to_string(),
            });
        }
        Ok(())
    }

    /// 단일 와이어 엔트리 생성
    ///
    /// 예약 키(`$key`, `date`)를 먼저 쓰고 속성을 나중에 병합한다.
    /// 속성 이름이 예약 키와 겹치면 속성 값이 남는다.
    /// 유한하지 않은 값(NaN, ±inf)은 JSON 숫자로 표현할 수 없어 `null`이 된다.
    pub fn to_wire_entry(&self) -> Map<String, Value> {
        let mut entry = Map::new();
        entry.insert(self.wire_key(), wire_number(self.value));

        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty()) {
            entry.insert(DATE_KEY.to_string(), Value::String(date.to_string()));
        }

        for (name, value) in &self.attributes {
            entry.insert(name.clone(), value.clone());
        }

        entry
    }
}

/// f32를 JSON 숫자로 변환
///
/// f64로 단순 확장하면 `0.1f32`가 `0.10000000149011612`로 전송되므로
/// f32의 최단 십진 표현을 거쳐 변환한다. 다시 f32로 읽으면 원래 값과 같다.
fn wire_number(value: f32) -> Value {
    if !value.is_finite() {
        return Value::Null;
    }

    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// 푸시 요청 본문
#[derive(Debug, Serialize)]
struct KpiWrap {
    data: Vec<Map<String, Value>>,
}

/// KPI 목록을 푸시 요청 본문(JSON bytes)으로 직렬화
///
/// 입력 순서가 `data` 배열 순서로 유지된다. 빈 목록은 `{"data":[]}`.
pub fn serialize_kpis(kpis: &[Kpi]) -> Result<Vec<u8>, CoreError> {
    if let Some(kpi) = kpis.iter().find(|k| !k.value.is_finite()) {
        return Err(CoreError::Serialization(serde::ser::Error::custom(format!(
            "KPI '{}' 값이 유한하지 않음: {}",
            kpi.key, kpi.value
        ))));
    }

    let wrap = KpiWrap {
        data: kpis.iter().map(Kpi::to_wire_entry).collect(),
    };

    Ok(serde_json::to_vec(&wrap)?)
}
