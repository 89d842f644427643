//! 头部解析入口
//!
//! 先查找 VOL 起始码, 找不到再查找 Short Video Header 起始码, 都没有则失败.
//! 解析器只保存配置, 位游标在每次调用内部创建, 重复调用互不影响.

use log::{debug, error, info};
use m4vh_core::{HeaderError, M4vResult};

use crate::config::{ParserConfig, PropertySource};
use crate::profile_level::ProfileLevelPolicy;
use crate::short_header::parse_short_header;
use crate::start_code::{
    SHORT_HEADER_START_CODE, VOL_START_CODE, VOP_START_CODE, find_all_start_codes,
    find_start_code,
};
use crate::types::StreamHeader;
use crate::vol_header::parse_vol_header;

/// MPEG-4 Part 2 / H.263 头部解析器
///
/// # 示例
/// ```
/// use m4vh_parse::HeaderParser;
///
/// let parser = HeaderParser::default();
/// // QCIF short video header
/// let data = [0x00, 0x00, 0x80, 0x02, 0x08, 0x00, 0x00, 0x00];
/// let header = parser.parse_header(&data).unwrap();
/// assert_eq!(header.dimensions().width, 176);
/// assert!(!parser.has_frame(&data));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderParser {
    config: ParserConfig,
}

impl HeaderParser {
    pub fn new(config: ParserConfig) -> Self {
        debug!(
            "HeaderParser: profile_check={}, level_check={}, max={}x{}",
            config.profile_check,
            config.level_check,
            config.limits.max_width,
            config.limits.max_height
        );
        Self { config }
    }

    /// 从键值配置源构造
    pub fn from_properties(source: &dyn PropertySource) -> Self {
        Self::new(ParserConfig::from_properties(source))
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// 解析 VOL 或 Short Video Header, 成功时返回图像尺寸等信息
    pub fn parse_header(&self, data: &[u8]) -> M4vResult<StreamHeader> {
        let header = self.dispatch(data)?;
        let dimensions = header.dimensions();
        dimensions
            .validate(self.config.limits.max_area())
            .inspect_err(|e| error!("图像尺寸校验失败: {}", e))?;
        info!("解析头部成功: {}", dimensions);
        Ok(header)
    }

    fn dispatch(&self, data: &[u8]) -> M4vResult<StreamHeader> {
        if let Some(offset) = find_start_code(data, &VOL_START_CODE) {
            debug!("找到 VOL 起始码, 偏移 {}", offset);
            let policy = ProfileLevelPolicy::from(&self.config);
            return parse_vol_header(&data[offset..], &self.config.limits, &policy)
                .map(StreamHeader::Vol)
                .inspect_err(|e| error!("VOL 头部解析失败: {}", e));
        }

        if find_start_code(data, &SHORT_HEADER_START_CODE).is_some() {
            debug!("未找到 VOL 起始码, 按 Short Video Header 解析");
            // Short Video Header 总是从缓冲区起始处解析
            return parse_short_header(data, &self.config.limits)
                .map(StreamHeader::ShortHeader)
                .inspect_err(|e| error!("Short Video Header 解析失败: {}", e));
        }

        error!("未找到 VOL 或 Short Video Header 起始码");
        Err(HeaderError::StartCodeNotFound)
    }

    /// 缓冲区中是否包含 VOP 起始码
    pub fn has_frame(&self, data: &[u8]) -> bool {
        find_start_code(data, &VOP_START_CODE).is_some()
    }

    /// 统计缓冲区中的 VOP 起始码个数
    pub fn count_frames(&self, data: &[u8]) -> usize {
        find_all_start_codes(data, &VOP_START_CODE).len()
    }
}
