//! 头部解析结果类型

use std::fmt;

use m4vh_core::{HeaderError, M4vResult};
use serde::Serialize;

use crate::profile_level::ProfileLevel;

/// 图像尺寸 (亮度像素)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PictureDimensions {
    pub width: u32,
    pub height: u32,
}

impl PictureDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 像素面积
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// 检查面积是否超过上限
    pub fn check_area(&self, limit: u64) -> M4vResult<()> {
        if self.area() > limit {
            return Err(HeaderError::ResolutionExceeded {
                width: self.width,
                height: self.height,
                limit,
            });
        }
        Ok(())
    }

    /// 检查 0 < 面积 <= 上限
    pub fn validate(&self, limit: u64) -> M4vResult<()> {
        if self.area() == 0 {
            return Err(HeaderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.check_area(limit)
    }
}

impl fmt::Display for PictureDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// H.263 source_format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceFormat {
    SubQcif,
    Qcif,
    Cif,
    Cif4,
    Cif16,
    /// 自定义图像格式 (CPFMT), 仅出现在 OPPTYPE 中
    Custom,
}

/// source_format 1-5 对应的标准分辨率
const STANDARD_FORMATS: [(SourceFormat, PictureDimensions); 5] = [
    (SourceFormat::SubQcif, PictureDimensions::new(128, 96)),
    (SourceFormat::Qcif, PictureDimensions::new(176, 144)),
    (SourceFormat::Cif, PictureDimensions::new(352, 288)),
    (SourceFormat::Cif4, PictureDimensions::new(704, 576)),
    (SourceFormat::Cif16, PictureDimensions::new(1408, 1152)),
];

impl SourceFormat {
    /// 查找标准格式 (1-5), 其他取值返回 `None`
    pub fn standard(code: u32) -> Option<(Self, PictureDimensions)> {
        match code {
            1..=5 => Some(STANDARD_FORMATS[code as usize - 1]),
            _ => None,
        }
    }

    /// 标准格式的固定分辨率, 自定义格式返回 `None`
    pub fn dimensions(&self) -> Option<PictureDimensions> {
        STANDARD_FORMATS
            .iter()
            .find(|(fmt, _)| fmt == self)
            .map(|&(_, dims)| dims)
    }
}

/// Short Video Header 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortHeaderInfo {
    pub dimensions: PictureDimensions,
    pub source_format: SourceFormat,
    /// 是否使用 PLUSPTYPE
    pub extended_ptype: bool,
    /// 自定义格式的像素宽高比代码
    pub pixel_aspect_ratio: Option<u8>,
}

/// VOL 头部解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolHeaderInfo {
    pub dimensions: PictureDimensions,
    pub profile_and_level: u8,
    pub version_id: u8,
    pub aspect_ratio_info: u8,
    pub time_increment_resolution: u16,
    /// vop_time_increment 的位宽
    pub n_bits_time: u32,
    pub fixed_vop_rate: bool,
    pub quant_type: bool,
    pub data_partitioned: bool,
}

impl VolHeaderInfo {
    /// profile_and_level_indication 的名称
    pub fn profile_level(&self) -> ProfileLevel {
        ProfileLevel::from_code(self.profile_and_level)
    }
}

/// 头部解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamHeader {
    /// MPEG-4 VOL 头部
    Vol(VolHeaderInfo),
    /// H.263 Short Video Header
    ShortHeader(ShortHeaderInfo),
}

impl StreamHeader {
    /// 图像尺寸
    pub fn dimensions(&self) -> PictureDimensions {
        match self {
            Self::Vol(vol) => vol.dimensions,
            Self::ShortHeader(sh) => sh.dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_formats() {
        assert_eq!(
            SourceFormat::standard(2),
            Some((SourceFormat::Qcif, PictureDimensions::new(176, 144)))
        );
        assert_eq!(SourceFormat::standard(0), None);
        assert_eq!(SourceFormat::standard(6), None);
        assert_eq!(
            SourceFormat::Cif16.dimensions(),
            Some(PictureDimensions::new(1408, 1152))
        );
        assert_eq!(SourceFormat::Custom.dimensions(), None);
    }

    #[test]
    fn test_validate_dimensions() {
        let dims = PictureDimensions::new(176, 144);
        assert!(dims.validate(176 * 144).is_ok());
        assert!(matches!(
            dims.validate(176 * 144 - 1),
            Err(HeaderError::ResolutionExceeded { .. })
        ));
        assert!(matches!(
            PictureDimensions::new(0, 144).validate(u64::MAX),
            Err(HeaderError::InvalidDimensions { .. })
        ));
    }
}
