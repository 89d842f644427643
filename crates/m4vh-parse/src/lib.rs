//! # m4vh-parse
//!
//! MPEG-4 Part 2 视觉基本流头部解析器.
//!
//! 从原始字节流中提取编码图像宽高, 校验 profile/level, 并检测是否包含 VOP:
//! - 起始码扫描 (VOL / Short Video Header / VOP)
//! - H.263 Short Video Header (含 PLUSPTYPE 与自定义图像格式)
//! - VOL 头部 (解析到 data_partitioned 为止)
//! - Simple Profile 白名单校验
//!
//! 不解码像素数据.
//!
//! ## 使用示例
//!
//! ```rust
//! use m4vh_parse::{HeaderParser, NoProperties};
//!
//! let parser = HeaderParser::from_properties(&NoProperties);
//! assert!(parser.parse_header(&[0xFF; 16]).is_err());
//! assert!(parser.has_frame(&[0x00, 0x00, 0x01, 0xB6]));
//! ```

pub mod config;
pub mod parser;
pub mod profile_level;
pub mod short_header;
pub mod start_code;
pub mod types;
pub mod vol_header;

// 重导出常用类型
pub use config::{DecodeLimits, EnvPropertySource, NoProperties, ParserConfig, PropertySource};
pub use m4vh_core::{ErrorKind, HeaderError, M4vResult, UnsupportedFeature};
pub use parser::HeaderParser;
pub use profile_level::{ProfileLevel, ProfileLevelPolicy};
pub use types::{PictureDimensions, ShortHeaderInfo, SourceFormat, StreamHeader, VolHeaderInfo};
