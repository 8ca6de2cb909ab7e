//! Rollcall Config - 통합 설정
//!
//! 글로벌 + 프로젝트 설정을 병합하는 RollcallConfig

use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 설정 파일명
pub const ROLLCALL_CONFIG_FILE: &str = "config.json";

/// Upper bound for a single role capacity accepted at event setup
pub const DEFAULT_MAX_ROLE_CAPACITY: u32 = 20;

const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Zero Capacity Policy
// ============================================================================

/// What a claim against a zero-capacity role does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCapacityPolicy {
    /// Fail with `RoleClosed`, leaving the user's current assignment untouched
    #[default]
    Reject,
    /// Queue on the waitlist. The entry can never be promoted.
    Waitlist,
}

impl ZeroCapacityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Waitlist => "waitlist",
        }
    }
}

// ============================================================================
// Rollcall Config (통합)
// ============================================================================

/// Rollcall 통합 설정
///
/// 모든 필드는 선택 사항이며, 비어 있으면 기본값을 사용
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollcallConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Maximum capacity accepted for any one role at event setup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_role_capacity: Option<u32>,

    /// Zero-capacity claim handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_capacity: Option<ZeroCapacityPolicy>,

    /// Send direct promotion notices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_promotions: Option<bool>,

    /// 기본 로그 레벨 (RUST_LOG 가 우선)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl RollcallConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Self::default()
        }
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<RollcallConfig>(ROLLCALL_CONFIG_FILE)? {
                debug!(path = %global.file_path(ROLLCALL_CONFIG_FILE).display(), "Loaded global config");
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) = project.load_optional::<RollcallConfig>(ROLLCALL_CONFIG_FILE)? {
                debug!(path = %project.file_path(ROLLCALL_CONFIG_FILE).display(), "Loaded project config");
                config.merge(project_config);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// 지정한 파일에서 로드
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut config = Self::new();
        config.merge(serde_json::from_str(&content)?);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            let known = ["trace", "debug", "info", "warn", "error"];
            if !known.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(Error::Config(format!("Unknown log level: {}", level)));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: RollcallConfig) {
        if other.max_role_capacity.is_some() {
            self.max_role_capacity = other.max_role_capacity;
        }
        if other.zero_capacity.is_some() {
            self.zero_capacity = other.zero_capacity;
        }
        if other.notify_promotions.is_some() {
            self.notify_promotions = other.notify_promotions;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    // ========================================================================
    // Accessors (기본값 적용)
    // ========================================================================

    pub fn max_role_capacity(&self) -> u32 {
        self.max_role_capacity.unwrap_or(DEFAULT_MAX_ROLE_CAPACITY)
    }

    pub fn zero_capacity(&self) -> ZeroCapacityPolicy {
        self.zero_capacity.unwrap_or_default()
    }

    pub fn notify_promotions(&self) -> bool {
        self.notify_promotions.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_max_role_capacity(mut self, max: u32) -> Self {
        self.max_role_capacity = Some(max);
        self
    }

    pub fn with_zero_capacity(mut self, policy: ZeroCapacityPolicy) -> Self {
        self.zero_capacity = Some(policy);
        self
    }

    pub fn with_notify_promotions(mut self, enabled: bool) -> Self {
        self.notify_promotions = Some(enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RollcallConfig::new();
        assert_eq!(config.version, 1);
        assert_eq!(config.max_role_capacity(), DEFAULT_MAX_ROLE_CAPACITY);
        assert_eq!(config.zero_capacity(), ZeroCapacityPolicy::Reject);
        assert!(config.notify_promotions());
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_merge_other_wins() {
        let mut base = RollcallConfig::new().with_max_role_capacity(10);
        let project = RollcallConfig {
            zero_capacity: Some(ZeroCapacityPolicy::Waitlist),
            ..RollcallConfig::default()
        };

        base.merge(project);

        // 지정되지 않은 값은 유지
        assert_eq!(base.max_role_capacity(), 10);
        assert_eq!(base.zero_capacity(), ZeroCapacityPolicy::Waitlist);
    }

    #[test]
    fn test_load_from_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "maxRoleCapacity": 40, "zeroCapacity": "waitlist", "notifyPromotions": false }"#,
        )
        .unwrap();

        let config = RollcallConfig::load_from(&path).unwrap();
        assert_eq!(config.max_role_capacity(), 40);
        assert_eq!(config.zero_capacity(), ZeroCapacityPolicy::Waitlist);
        assert!(!config.notify_promotions());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "logLevel": "loud" }"#).unwrap();

        assert!(matches!(
            RollcallConfig::load_from(&path),
            Err(Error::Config(_))
        ));
    }
}
