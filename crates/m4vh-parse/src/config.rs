//! 解析器配置.
//!
//! 配置只在构造解析器时读取一次. 两个检查开关来自外部键值存储
//! ([`PropertySource`]), 只有字面值 `"false"` 会关闭对应检查; 键缺失或其他取值
//! 均保持开启.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use m4vh_core::{HeaderError, M4vResult};
use serde::{Deserialize, Serialize};

/// profile 检查开关的属性键
pub const PROFILE_CHECK_KEY: &str = "persist.omxvideo.profilecheck";
/// level 检查开关的属性键
pub const LEVEL_CHECK_KEY: &str = "persist.omxvideo.levelcheck";

/// 只读键值配置源
pub trait PropertySource {
    /// 查询属性值, 键不存在或查询失败时返回 `None`
    fn get(&self, key: &str) -> Option<String>;
}

impl PropertySource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// 空配置源, 所有查询均返回 `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertySource for NoProperties {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// 基于环境变量的配置源
///
/// 属性键转换为大写, `.` 替换为 `_`, 例如
/// `persist.omxvideo.profilecheck` -> `PERSIST_OMXVIDEO_PROFILECHECK`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPropertySource;

impl EnvPropertySource {
    /// 属性键对应的环境变量名
    pub fn env_name(key: &str) -> String {
        key.replace('.', "_").to_ascii_uppercase()
    }
}

impl PropertySource for EnvPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::env_name(key)).ok()
    }
}

/// 分辨率上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// 最大解码宽度 (与高度相乘得到面积上限)
    pub max_width: u32,
    /// 最大解码高度
    pub max_height: u32,
    /// data_partitioned 码流的宽度上限 (WVGA)
    pub data_partitioned_max_width: u32,
    /// data_partitioned 码流的高度上限 (WVGA)
    pub data_partitioned_max_height: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1088,
            data_partitioned_max_width: 800,
            data_partitioned_max_height: 480,
        }
    }
}

impl DecodeLimits {
    /// 通用面积上限
    pub fn max_area(&self) -> u64 {
        u64::from(self.max_width) * u64::from(self.max_height)
    }

    /// data_partitioned 面积上限
    pub fn data_partitioned_max_area(&self) -> u64 {
        u64::from(self.data_partitioned_max_width) * u64::from(self.data_partitioned_max_height)
    }
}

/// 解析器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 是否启用 profile 检查
    pub profile_check: bool,
    /// 是否启用 level 检查
    pub level_check: bool,
    /// 分辨率上限
    pub limits: DecodeLimits,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            profile_check: true,
            level_check: true,
            limits: DecodeLimits::default(),
        }
    }
}

impl ParserConfig {
    /// 从属性源读取两个检查开关, 分辨率上限取默认值
    pub fn from_properties(source: &dyn PropertySource) -> Self {
        Self {
            profile_check: read_switch(source, PROFILE_CHECK_KEY),
            level_check: read_switch(source, LEVEL_CHECK_KEY),
            limits: DecodeLimits::default(),
        }
    }

    /// 从 JSON 文本解析, 缺省字段取默认值
    pub fn from_json_str(text: &str) -> M4vResult<Self> {
        serde_json::from_str(text).map_err(|e| HeaderError::Config(format!("JSON 解析失败: {}", e)))
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> M4vResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HeaderError::Config(format!("读取配置文件失败, path={}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }
}

fn read_switch(source: &dyn PropertySource, key: &str) -> bool {
    match source.get(key) {
        Some(value) => {
            debug!("属性 [{}] = {:?}", key, value);
            value != "false"
        }
        None => {
            warn!("获取属性 [{}] 失败, 保持检查开启", key);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_enables_both_checks() {
        let config = ParserConfig::from_properties(&NoProperties);
        assert!(config.profile_check);
        assert!(config.level_check);
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_only_literal_false_disables() {
        let source = props(&[(PROFILE_CHECK_KEY, "false"), (LEVEL_CHECK_KEY, "FALSE")]);
        let config = ParserConfig::from_properties(&source);
        assert!(!config.profile_check, "\"false\" 应关闭 profile 检查");
        assert!(config.level_check, "\"FALSE\" 不是字面值 false, 应保持开启");

        let source = props(&[(PROFILE_CHECK_KEY, "0"), (LEVEL_CHECK_KEY, "false")]);
        let config = ParserConfig::from_properties(&source);
        assert!(config.profile_check);
        assert!(!config.level_check);
    }

    #[test]
    fn test_env_name_mapping() {
        assert_eq!(
            EnvPropertySource::env_name(PROFILE_CHECK_KEY),
            "PERSIST_OMXVIDEO_PROFILECHECK"
        );
        assert_eq!(
            EnvPropertySource::env_name(LEVEL_CHECK_KEY),
            "PERSIST_OMXVIDEO_LEVELCHECK"
        );
    }

    #[test]
    fn test_env_source_reads_variable() {
        // "path" 映射到 PATH
        assert_eq!(EnvPropertySource.get("path"), std::env::var("PATH").ok());
        assert_eq!(
            EnvPropertySource.get("m4vh.test.unset.key"),
            None
        );
    }

    #[test]
    fn test_from_json_partial() {
        let config = ParserConfig::from_json_str(r#"{ "level_check": false }"#).unwrap();
        assert!(config.profile_check);
        assert!(!config.level_check);
        assert_eq!(config.limits, DecodeLimits::default());

        let config =
            ParserConfig::from_json_str(r#"{ "limits": { "max_width": 720, "max_height": 576 } }"#)
                .unwrap();
        assert_eq!(config.limits.max_area(), 720 * 576);
        assert_eq!(config.limits.data_partitioned_max_area(), 800 * 480);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = ParserConfig::from_json_str("{ profile_check: ").unwrap_err();
        assert!(matches!(err, HeaderError::Config(_)));
    }
}
