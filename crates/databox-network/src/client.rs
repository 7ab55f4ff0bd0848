//! Databox 푸시 클라이언트.
//!
//! KPI 직렬화 → `Transport` 호출 → 응답 디코드를 묶는 퍼사드.
//! 호출마다 독립적인 단일 왕복이며 클라이언트 상태는 생성 후 변하지 않는다.

use std::sync::Arc;

use databox_core::config::ClientConfig;
use databox_core::error::CoreError;
use databox_core::models::kpi::{serialize_kpis, Kpi};
use databox_core::models::response::{parse_last_pushes, parse_status, LastPush, ResponseStatus};
use databox_core::ports::transport::{check_token, Transport};
use tracing::debug;

use crate::http_transport::HttpTransport;

/// 푸시 경로
const PUSH_PATH: &str = "/";

/// 푸시 이력 경로
const LAST_PUSHES_PATH: &str = "/lastpushes";

/// Databox 푸시 API 클라이언트
///
/// 복제 비용이 작고(`Arc`) 여러 태스크에서 동시에 사용해도 안전하다.
/// 토큰은 전송 계층이 소유하며, 요청 서명과 `token()`은 같은 값을 본다.
#[derive(Clone)]
pub struct DataboxClient {
    transport: Arc<dyn Transport>,
}

impl DataboxClient {
    /// 운영 푸시 호스트를 사용하는 클라이언트 생성 (네트워크 호출 없음)
    pub fn new(token: &str) -> Result<Self, CoreError> {
        Self::with_config(token, &ClientConfig::default())
    }

    /// 설정을 지정해 클라이언트 생성
    pub fn with_config(token: &str, config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(token, config)?;
        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    /// 전송 계층을 직접 주입해 클라이언트 생성
    ///
    /// 토큰은 `transport.token()`을 그대로 쓴다.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self, CoreError> {
        check_token(transport.token())?;
        Ok(Self { transport })
    }

    /// 푸시 토큰
    pub fn token(&self) -> &str {
        self.transport.token()
    }

    /// 요청 대상 호스트
    pub fn host(&self) -> &str {
        self.transport.base_url()
    }

    /// KPI 하나 푸시
    ///
    /// 서버가 일부 지표를 거부해도 `Ok`를 반환한다. 거부 여부는
    /// `ResponseStatus::errors`로 확인해야 한다.
    pub async fn push(&self, kpi: &Kpi) -> Result<ResponseStatus, CoreError> {
        kpi.validate()?;

        let payload = serialize_kpis(std::slice::from_ref(kpi))?;
        debug!("KPI 푸시: {}, {} bytes", kpi.key, payload.len());

        let body = self.transport.post(PUSH_PATH, payload).await?;
        let status = parse_status(&body)?;

        debug!(
            "푸시 응답: id={}, metrics={}, errors={}",
            status.id,
            status.metrics.len(),
            status.errors.len()
        );
        Ok(status)
    }

    /// 최근 `n`개의 푸시 이력 조회
    ///
    /// 상한은 서버가 정한다.
    pub async fn last_pushes(&self, n: u32) -> Result<Vec<LastPush>, CoreError> {
        let path = format!("{LAST_PUSHES_PATH}/{n}");
        let body = self.transport.get(&path).await?;
        let pushes = parse_last_pushes(&body)?;
        debug!("푸시 이력 {}건 수신 (요청 {n})", pushes.len());
        Ok(pushes)
    }

    /// 가장 최근 푸시 하나 조회
    ///
    /// 이력이 비어 있으면 `CoreError::NotFound`.
    pub async fn last_push(&self) -> Result<LastPush, CoreError> {
        let body = self.transport.get(LAST_PUSHES_PATH).await?;
        parse_last_pushes(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "LastPush".to_string(),
                id: LAST_PUSHES_PATH.to_string(),
            })
    }
}

impl std::fmt::Debug for DataboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataboxClient")
            .field("host", &self.host())
            .field("token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_transport::{MemoryTransport, RequestMethod, MEMORY_TOKEN};
    use serde_json::json;

    const TOKEN: &str = "adxg1kq5a4g04k0wk0s4wkssow8osw84";

    fn client_with(transport: &Arc<MemoryTransport>) -> DataboxClient {
        DataboxClient::with_transport(transport.clone()).unwrap()
    }

    #[test]
    fn new_uses_production_host() {
        let client = DataboxClient::new(TOKEN).unwrap();
        assert_eq!(client.token(), TOKEN);
        assert_eq!(client.host(), "https://push2new.databox.com");
    }

    #[test]
    fn blank_token_rejected() {
        let err = DataboxClient::new(" ").unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "token"));
    }

    #[test]
    fn token_comes_from_transport() {
        let transport = Arc::new(MemoryTransport::new().with_token(TOKEN));
        let client = DataboxClient::with_transport(transport).unwrap();
        assert_eq!(client.token(), TOKEN);

        let client = DataboxClient::with_transport(Arc::new(MemoryTransport::new())).unwrap();
        assert_eq!(client.token(), MEMORY_TOKEN);
    }

    #[test]
    fn injected_transport_with_blank_token_rejected() {
        let transport = Arc::new(MemoryTransport::new().with_token(""));
        let err = DataboxClient::with_transport(transport).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "token"));
    }

    #[test]
    fn debug_hides_token() {
        let client = DataboxClient::new(TOKEN).unwrap();
        assert!(!format!("{client:?}").contains(TOKEN));
    }

    #[tokio::test]
    async fn push_success() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_json(&json!({"id": "abc", "metrics": ["temp.ny"], "errors": []}));
        let client = client_with(&transport);

        let status = client.push(&Kpi::new("temp.ny", 60.0)).await.unwrap();
        assert!(status.errors.is_empty());
        assert_eq!(status.id, "abc");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, RequestMethod::Post);
        assert_eq!(request.path, "/");
        assert_eq!(
            request.body_json(),
            Some(json!({"data": [{"$temp.ny": 60.0}]}))
        );
    }

    #[tokio::test]
    async fn push_partial_failure_is_not_an_error() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_json(&json!({"errors": ["invalid date"]}));
        let client = client_with(&transport);

        let kpi = Kpi::new("temp.ny", 52.0).with_date("2015-01-01 09:00:00");
        let status = client.push(&kpi).await.unwrap();
        assert_eq!(status.errors, vec!["invalid date"]);
        assert!(!status.is_success());

        let body = transport.last_request().unwrap().body_json().unwrap();
        assert_eq!(body["data"][0]["date"], json!("2015-01-01 09:00:00"));
    }

    #[tokio::test]
    async fn push_empty_key_never_sent() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(&transport);

        let err = client.push(&Kpi::new("", 1.0)).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn push_non_finite_is_serialization_error() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(&transport);

        let err = client.push(&Kpi::new("x", f32::NAN)).await.unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn push_transport_error_propagates() {
        let transport = Arc::new(MemoryTransport::new());
        transport.fail_with("connection refused");
        let client = client_with(&transport);

        let err = client.push(&Kpi::new("temp.ny", 1.0)).await.unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)));
    }

    #[tokio::test]
    async fn push_garbage_response_is_decode_error() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_with("<html>502 Bad Gateway</html>");
        let client = client_with(&transport);

        let err = client.push(&Kpi::new("temp.ny", 1.0)).await.unwrap_err();
        match err {
            CoreError::Decode {
                body_len, preview, ..
            } => {
                assert_eq!(body_len, 28);
                assert!(preview.contains("502"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn last_pushes_path_and_decode() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_json(&json!([
            {"request": {"errors": [], "body": {"data": [{"$a": 1}]}}, "response": {"body": {"id": "1"}}, "metrics": ["a"]},
            {"request": {"errors": [], "body": {"data": [{"$b": 2}]}}, "response": {"body": {"id": "2"}}, "metrics": ["b"]}
        ]));
        let client = client_with(&transport);

        let pushes = client.last_pushes(2).await.unwrap();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].metrics, vec!["a"]);
        assert_eq!(pushes[1].response.body.id, "2");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, RequestMethod::Get);
        assert_eq!(request.path, "/lastpushes/2");
    }

    #[tokio::test]
    async fn last_pushes_empty_is_ok() {
        let transport = Arc::new(MemoryTransport::with_default_body("[]"));
        let client = client_with(&transport);

        assert!(client.last_pushes(0).await.unwrap().is_empty());
        assert_eq!(transport.last_request().unwrap().path, "/lastpushes/0");
    }

    #[tokio::test]
    async fn last_push_takes_first() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_json(&json!([
            {"metrics": ["newest"]},
            {"metrics": ["older"]}
        ]));
        let client = client_with(&transport);

        let push = client.last_push().await.unwrap();
        assert_eq!(push.metrics, vec!["newest"]);
        assert_eq!(transport.last_request().unwrap().path, "/lastpushes");
    }

    #[tokio::test]
    async fn last_push_empty_is_not_found() {
        let transport = Arc::new(MemoryTransport::with_default_body("[]"));
        let client = client_with(&transport);

        let err = client.last_push().await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn last_push_object_is_decode_error() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(&transport);

        // 기본 응답 `{}`는 배열이 아님
        let err = client.last_push().await.unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn shared_across_tasks() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(&transport);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.push(&Kpi::new(format!("k{i}"), i as f32)).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(transport.requests().len(), 8);
    }
}
