//! # rollcall-foundation
//!
//! Foundation layer for Rollcall:
//! - Error: 공통 에러 타입 (InvalidAction, UnknownEvent, RoleClosed ...)
//! - Config: 통합 설정 (RollcallConfig, 글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (설정 파일)

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{RollcallConfig, ZeroCapacityPolicy, DEFAULT_MAX_ROLE_CAPACITY, ROLLCALL_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
