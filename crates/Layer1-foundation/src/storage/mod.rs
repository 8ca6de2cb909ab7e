//! Storage module for Rollcall
//!
//! - `json`: JSON 설정 파일 로드 (read-only)
//!
//! Registration state itself is process-lifetime and never persisted.

mod json;

// JSON Storage (범용)
pub use json::JsonStore;
