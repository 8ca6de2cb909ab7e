//! Error types for Rollcall
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Rollcall 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 신청 (sign-up) 관련
    // ========================================================================
    /// Unrecognized role or malformed action. Rejected before any state access.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Action or lookup against an event that was never opened (or is closed)
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Claim against a role whose capacity is zero
    #[error("Role is closed: {0}")]
    RoleClosed(String),

    #[error("Invalid capacity for {role}: {value} (max {max})")]
    InvalidCapacity { role: String, value: u32, max: u32 },

    // ========================================================================
    // Sink 관련 (best-effort, never fatal to a transition)
    // ========================================================================
    #[error("Render sink error: {0}")]
    Render(String),

    #[error("Notify error: {0}")]
    Notify(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidAction(_)
                | Error::UnknownEvent(_)
                | Error::RoleClosed(_)
                | Error::InvalidCapacity { .. }
        )
    }

    /// Capacity 에러 생성 헬퍼
    pub fn invalid_capacity(role: impl Into<String>, value: u32, max: u32) -> Self {
        Error::InvalidCapacity {
            role: role.into(),
            value,
            max,
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
