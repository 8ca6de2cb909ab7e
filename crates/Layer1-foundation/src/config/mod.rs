//! Config - 통합 설정 관리
//!
//! - `rollcall.rs` - RollcallConfig 통합 설정

mod rollcall;

pub use rollcall::{RollcallConfig, ZeroCapacityPolicy, DEFAULT_MAX_ROLE_CAPACITY, ROLLCALL_CONFIG_FILE};
