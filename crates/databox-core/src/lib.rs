//! # databox-core
//!
//! Databox 푸시 클라이언트의 도메인 모델, 포트(trait), 에러 타입.
//! 네트워크 의존성 없이 와이어 페이로드 생성과 응답 디코드를 담당한다.
//!
//! ## 구조
//!
//! - [`models`]: KPI와 응답 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: 전송 계층 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 클라이언트 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use config::ClientConfig;
pub use error::CoreError;
pub use models::kpi::Kpi;
pub use models::response::{LastPush, ResponseStatus};
