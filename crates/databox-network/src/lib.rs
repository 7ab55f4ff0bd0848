//! # databox-network
//!
//! Databox 푸시 API 네트워크 어댑터와 클라이언트 퍼사드.
//! reqwest 기반 `HttpTransport`로 KPI를 푸시하고 푸시 이력을 조회한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use databox_core::Kpi;
//! use databox_network::client::DataboxClient;
//!
//! let client = DataboxClient::new("push-token")?;
//! let status = client.push(&Kpi::new("temp.ny", 60.0)).await?;
//! if !status.is_success() {
//!     eprintln!("거부된 지표: {:?}", status.errors);
//! }
//! ```

pub mod client;
pub mod http_transport;
pub mod memory_transport;

pub use client::DataboxClient;
pub use http_transport::HttpTransport;
pub use memory_transport::MemoryTransport;
