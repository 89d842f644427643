//! # m4vh-core
//!
//! m4vh 的底层基础设施: 统一错误类型与按位读写工具.
//!
//! 上层的 `m4vh-parse` 在此之上实现 MPEG-4 Part 2 / H.263 头部解析.

pub mod bitreader;
pub mod bitwriter;
pub mod error;

// 重导出常用类型
pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
pub use error::{ErrorKind, HeaderError, M4vResult, UnsupportedFeature};
