//! profile_and_level_indication 校验

use std::fmt;

use log::{error, info};
use m4vh_core::{HeaderError, M4vResult};
use serde::Serialize;

use crate::config::ParserConfig;

/// 检查开启时允许的 Simple Profile 级别: L0, L1, L2, L3, L4a
pub const SUPPORTED_PROFILE_LEVELS: [u8; 5] = [0x08, 0x01, 0x02, 0x03, 0x04];

/// MPEG-4 Visual profile/level 代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfileLevel {
    SimpleL0,
    SimpleL0b,
    SimpleL1,
    SimpleL2,
    SimpleL3,
    SimpleL4a,
    SimpleL5,
    SimpleL6,
    AdvancedSimple(u8),
    Unknown(u8),
}

impl ProfileLevel {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x08 => Self::SimpleL0,
            0x09 => Self::SimpleL0b,
            0x01 => Self::SimpleL1,
            0x02 => Self::SimpleL2,
            0x03 => Self::SimpleL3,
            0x04 => Self::SimpleL4a,
            0x05 => Self::SimpleL5,
            0x06 => Self::SimpleL6,
            0xF0..=0xF5 => Self::AdvancedSimple(code - 0xF0),
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ProfileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleL0 => write!(f, "Simple@L0"),
            Self::SimpleL0b => write!(f, "Simple@L0b"),
            Self::SimpleL1 => write!(f, "Simple@L1"),
            Self::SimpleL2 => write!(f, "Simple@L2"),
            Self::SimpleL3 => write!(f, "Simple@L3"),
            Self::SimpleL4a => write!(f, "Simple@L4a"),
            Self::SimpleL5 => write!(f, "Simple@L5"),
            Self::SimpleL6 => write!(f, "Simple@L6"),
            Self::AdvancedSimple(level) => write!(f, "AdvancedSimple@L{}", level),
            Self::Unknown(code) => write!(f, "unknown(0x{:02X})", code),
        }
    }
}

/// profile/level 校验策略
///
/// 两个开关同时开启时才执行白名单检查, 任一关闭即全部放行.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLevelPolicy {
    pub profile_check: bool,
    pub level_check: bool,
}

impl Default for ProfileLevelPolicy {
    fn default() -> Self {
        Self {
            profile_check: true,
            level_check: true,
        }
    }
}

impl From<&ParserConfig> for ProfileLevelPolicy {
    fn from(config: &ParserConfig) -> Self {
        Self {
            profile_check: config.profile_check,
            level_check: config.level_check,
        }
    }
}

impl ProfileLevelPolicy {
    /// 是否执行白名单检查
    pub fn enforced(&self) -> bool {
        self.profile_check && self.level_check
    }

    pub fn validate(&self, code: u8) -> M4vResult<()> {
        info!(
            "MPEG-4 profile_and_level_indication: 0x{:02X} ({})",
            code,
            ProfileLevel::from_code(code)
        );
        if self.enforced() && !SUPPORTED_PROFILE_LEVELS.contains(&code) {
            error!("不支持的 profile/level: 0x{:02X}", code);
            return Err(HeaderError::ProfileLevelRejected(code));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_when_enforced() {
        let policy = ProfileLevelPolicy::default();
        for code in 0..=255u8 {
            let result = policy.validate(code);
            if SUPPORTED_PROFILE_LEVELS.contains(&code) {
                assert!(result.is_ok(), "0x{:02X} 应被接受", code);
            } else {
                assert_eq!(result, Err(HeaderError::ProfileLevelRejected(code)));
            }
        }
    }

    #[test]
    fn test_bypass_when_either_switch_off() {
        let policies = [
            ProfileLevelPolicy {
                profile_check: false,
                level_check: true,
            },
            ProfileLevelPolicy {
                profile_check: true,
                level_check: false,
            },
            ProfileLevelPolicy {
                profile_check: false,
                level_check: false,
            },
        ];
        for policy in policies {
            assert!(!policy.enforced());
            for code in 0..=255u8 {
                assert!(policy.validate(code).is_ok());
            }
        }
    }

    #[test]
    fn test_profile_level_names() {
        assert_eq!(ProfileLevel::from_code(0x08), ProfileLevel::SimpleL0);
        assert_eq!(ProfileLevel::from_code(0xF3).to_string(), "AdvancedSimple@L3");
        assert_eq!(ProfileLevel::from_code(0x42).to_string(), "unknown(0x42)");
    }
}
