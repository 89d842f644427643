//! # m4vh
//!
//! MPEG-4 Part 2 / H.263 视觉基本流头部探测库.
//!
//! 给定一段原始码流, 提取编码图像宽高、校验 profile/level、检测是否包含 VOP,
//! 不做像素解码.
//!
//! # 快速开始
//!
//! ```rust
//! use m4vh::parse::{HeaderParser, ParserConfig};
//!
//! let parser = HeaderParser::new(ParserConfig::default());
//! let data = [0x00, 0x00, 0x80, 0x02, 0x0C, 0x00, 0x00, 0x00];
//! let header = parser.parse_header(&data).unwrap();
//! println!("尺寸: {}", header.dimensions());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `m4vh-core` | 错误类型与比特流读写 |
//! | `m4vh-parse` | 起始码扫描与头部解析 |

/// 错误类型与比特流读写
pub use m4vh_core as core;

/// 起始码扫描与头部解析
pub use m4vh_parse as parse;

pub mod logging;

/// 获取 m4vh 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 按环境变量构造解析器
///
/// 检查开关取自 `PERSIST_OMXVIDEO_PROFILECHECK` / `PERSIST_OMXVIDEO_LEVELCHECK`.
pub fn parser_from_env() -> m4vh_parse::HeaderParser {
    m4vh_parse::HeaderParser::from_properties(&m4vh_parse::EnvPropertySource)
}
