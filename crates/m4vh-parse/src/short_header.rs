//! H.263 Short Video Header 解析
//!
//! 只解析到能确定图像尺寸为止: 标准 source_format 直接查表,
//! PLUSPTYPE 需要 OPPTYPE (UFEP=1), 自定义格式从 CPFMT 读取宽高.
//! 使用任何可选 Annex 的码流 (非 baseline) 一律拒绝.
//!
//! 语法 (按位):
//! - short_video_start_marker: 22
//! - temporal_reference(8) marker(1) zero(1) split_screen(1) document_camera(1)
//!   full_picture_freeze_release(1): 共 13, 跳过
//! - source_format: 3
//! - PLUSPTYPE (source_format=7): UFEP(3) [OPPTYPE(18)] MPPTYPE(9), 之后 CPM(1)
//! - CPFMT (自定义格式): [PSBI(2)] PAR(4) width(9) marker(1) height(9)

use log::{debug, error};
use m4vh_core::{BitReader, HeaderError, M4vResult, UnsupportedFeature};

use crate::config::DecodeLimits;
use crate::types::{PictureDimensions, ShortHeaderInfo, SourceFormat};

/// short_video_start_marker: 0000 0000 0000 0000 1000 00
pub const SHORT_VIDEO_START_MARKER: u32 = 0x20;
const SHORT_VIDEO_START_MARKER_LEN: u32 = 22;

/// source_format=7: 使用 PLUSPTYPE
const SOURCE_FORMAT_EXTENDED: u32 = 7;
/// OPPTYPE 中 source_format=6: 自定义图像格式
const SOURCE_FORMAT_CUSTOM: u32 = 6;

/// 解析 Short Video Header, 从 `data` 第 0 位开始
pub fn parse_short_header(data: &[u8], limits: &DecodeLimits) -> M4vResult<ShortHeaderInfo> {
    let mut reader = BitReader::new(data);

    if reader.read_bits(SHORT_VIDEO_START_MARKER_LEN)? != SHORT_VIDEO_START_MARKER {
        return Err(HeaderError::MalformedMarker {
            field: "short_video_start_marker",
        });
    }

    reader.skip_bits(13)?;

    let source_format = reader.read_bits(3)?;
    let info = if source_format == SOURCE_FORMAT_EXTENDED {
        parse_plus_ptype(&mut reader)?
    } else {
        let (format, dimensions) = SourceFormat::standard(source_format)
            .ok_or(HeaderError::Unsupported(UnsupportedFeature::SourceFormat(
                source_format,
            )))?;
        ShortHeaderInfo {
            dimensions,
            source_format: format,
            extended_ptype: false,
            pixel_aspect_ratio: None,
        }
    };

    let limit = limits.max_area();
    if info.dimensions.area() > limit {
        error!("图像尺寸超出支持范围: {}", info.dimensions);
        return Err(HeaderError::ResolutionExceeded {
            width: info.dimensions.width,
            height: info.dimensions.height,
            limit,
        });
    }

    debug!(
        "Short Video Header: {} ({:?})",
        info.dimensions, info.source_format
    );
    Ok(info)
}

/// 解析 PLUSPTYPE, 返回由 OPPTYPE / CPFMT 确定的尺寸
fn parse_plus_ptype(reader: &mut BitReader) -> M4vResult<ShortHeaderInfo> {
    let ufep = reader.read_bits(3)?;
    match ufep {
        // 只有 MPPTYPE, 无 OPPTYPE: 仅对非 INTRA 图像有效, 无法确定尺寸
        0 => return Err(HeaderError::MissingOpptype),
        1 => {}
        other => return Err(HeaderError::Unsupported(UnsupportedFeature::Ufep(other))),
    }

    let code = reader.read_bits(3)?;
    let standard = match code {
        SOURCE_FORMAT_CUSTOM => None,
        _ => Some(
            SourceFormat::standard(code)
                .ok_or(HeaderError::Unsupported(UnsupportedFeature::SourceFormat(code)))?,
        ),
    };

    // custom PCF
    reader.skip_bits(1)?;

    // 只支持 baseline (Profile 0), 不允许任何 Annex
    let annex_def = reader.read_bits(3)?;
    if annex_def != 0 {
        return Err(HeaderError::Unsupported(UnsupportedFeature::Annex(
            "D/E/F", annex_def,
        )));
    }
    let annex_ijknrst = reader.read_bits(7)?;
    if annex_ijknrst != 0 {
        return Err(HeaderError::Unsupported(UnsupportedFeature::Annex(
            "I/J/K/N/R/S/T",
            annex_ijknrst,
        )));
    }

    // marker + 3 位保留, 然后 MPPTYPE
    reader.skip_bits(4)?;
    reader.skip_bits(9)?;

    let cpm = reader.read_flag()?;

    if let Some((format, dimensions)) = standard {
        return Ok(ShortHeaderInfo {
            dimensions,
            source_format: format,
            extended_ptype: true,
            pixel_aspect_ratio: None,
        });
    }

    if cpm {
        // PSBI
        reader.skip_bits(2)?;
    }

    let par = reader.read_bits(4)?;
    if par == 0 {
        return Err(HeaderError::MalformedMarker {
            field: "pixel_aspect_ratio_code",
        });
    }

    let width_indication = reader.read_bits(9)?;
    let width = ((width_indication & 0x1FF) + 1) * 4;
    reader.expect_marker("cpfmt_marker_bit")?;
    let height_indication = reader.read_bits(9)?;
    let height = (height_indication & 0x1FF) * 4;

    debug!("CPFMT: {}x{}, PAR={}", width, height, par);

    Ok(ShortHeaderInfo {
        dimensions: PictureDimensions::new(width, height),
        source_format: SourceFormat::Custom,
        extended_ptype: true,
        pixel_aspect_ratio: Some(par as u8),
    })
}
