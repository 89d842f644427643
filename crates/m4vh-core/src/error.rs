//! 统一错误类型定义.
//!
//! 头部解析的所有失败路径都映射到 [`HeaderError`], 每个错误在违规字段处立即返回,
//! 不做内部重试.

use std::fmt;

use thiserror::Error;

/// 结构合法但未实现的码流扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// UFEP 取值不是 0 或 1
    Ufep(u32),
    /// source_format 不在支持表内
    SourceFormat(u32),
    /// 可选 Annex 字段非零 (字段名, 取值)
    Annex(&'static str, u32),
    /// 非矩形 video_object_layer_shape
    Shape(u32),
    /// sprite_enable 非零
    Sprite(u32),
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ufep(v) => write!(f, "UFEP={}", v),
            Self::SourceFormat(v) => write!(f, "source_format={}", v),
            Self::Annex(name, v) => write!(f, "Annex {}=0x{:X}", name, v),
            Self::Shape(v) => write!(f, "video_object_layer_shape={}", v),
            Self::Sprite(v) => write!(f, "sprite_enable={}", v),
        }
    }
}

/// 头部解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// 固定取值字段 (起始标记, marker_bit 等) 不匹配
    #[error("标记字段无效: {field}")]
    MalformedMarker { field: &'static str },

    /// PLUSPTYPE 中 UFEP=0, 缺少 OPPTYPE, 无法确定分辨率
    #[error("UFEP=0: 缺少 OPPTYPE, 无法确定图像尺寸")]
    MissingOpptype,

    /// 不支持的码流变体
    #[error("不支持的码流特性: {0}")]
    Unsupported(UnsupportedFeature),

    /// 图像面积超过允许上限
    #[error("分辨率超出上限: {width}x{height} > {limit} 像素")]
    ResolutionExceeded { width: u32, height: u32, limit: u64 },

    /// 图像尺寸为零
    #[error("无效的图像尺寸: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// 未找到 VOL 或 Short Header 起始码
    #[error("未找到 VOL 或 Short Video Header 起始码")]
    StartCodeNotFound,

    /// profile_and_level_indication 不在白名单中
    #[error("不支持的 profile/level: 0x{0:02X}")]
    ProfileLevelRejected(u8),

    /// 输入在字段读取完成前结束
    #[error("数据不足: 需要 {needed} 位, 剩余 {available} 位")]
    Truncated { needed: usize, available: usize },

    /// 调用参数非法
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 配置加载失败
    #[error("配置错误: {0}")]
    Config(String),
}

/// 错误分类, 与具体字段无关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedMarker,
    Unsupported,
    ResolutionExceeded,
    StartCodeNotFound,
    ProfileLevelRejected,
    Truncated,
    Other,
}

impl HeaderError {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedMarker { .. } | Self::MissingOpptype => ErrorKind::MalformedMarker,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::ResolutionExceeded { .. } | Self::InvalidDimensions { .. } => {
                ErrorKind::ResolutionExceeded
            }
            Self::StartCodeNotFound => ErrorKind::StartCodeNotFound,
            Self::ProfileLevelRejected(_) => ErrorKind::ProfileLevelRejected,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::InvalidArgument(_) | Self::Config(_) => ErrorKind::Other,
        }
    }
}

/// m4vh 统一 Result 类型
pub type M4vResult<T> = Result<T, HeaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            HeaderError::MissingOpptype.kind(),
            ErrorKind::MalformedMarker
        );
        assert_eq!(
            HeaderError::Unsupported(UnsupportedFeature::Sprite(1)).kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            HeaderError::InvalidDimensions {
                width: 0,
                height: 16
            }
            .kind(),
            ErrorKind::ResolutionExceeded
        );
        assert_eq!(
            HeaderError::Truncated {
                needed: 8,
                available: 3
            }
            .kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn test_error_display() {
        let err = HeaderError::Unsupported(UnsupportedFeature::Annex("D/E/F", 4));
        assert_eq!(err.to_string(), "不支持的码流特性: Annex D/E/F=0x4");

        let err = HeaderError::ProfileLevelRejected(0xF5);
        assert_eq!(err.to_string(), "不支持的 profile/level: 0xF5");
    }
}
