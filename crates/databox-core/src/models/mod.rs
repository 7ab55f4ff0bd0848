//! Databox 푸시 API 도메인 모델.
//!
//! 요청 측 KPI와 응답 측 상태/이력 구조체를 정의한다.

pub mod kpi;
pub mod response;
