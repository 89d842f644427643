//! VOL (Video Object Layer) 头部解析
//!
//! 顺序遍历 VOL 字段直到 data_partitioned 为止, 其余字段不解析.
//! 解析得到的宽高与 profile_and_level_indication 用于判断码流能否解码.
//! 以下码流会被拒绝:
//! - 非矩形 shape
//! - sprite_enable 非零
//! - data_partitioned 且分辨率超过 WVGA

use log::{debug, error};
use m4vh_core::{BitReader, HeaderError, M4vResult, UnsupportedFeature};

use crate::config::DecodeLimits;
use crate::profile_level::ProfileLevelPolicy;
use crate::types::{PictureDimensions, VolHeaderInfo};

/// aspect_ratio_info: extended PAR
const EXTENDED_PAR: u32 = 0xF;
/// video_object_layer_shape: rectangular
const SHAPE_RECTANGULAR: u32 = 0;
/// first_half_bit_rate ... latter_half_vbv_occupancy 及其 marker 位
const VBV_PARAMETERS_BITS: usize = 79;
/// 量化矩阵最多 64 个系数
const QUANT_MATRIX_COEFFS: u32 = 64;

/// 量化矩阵选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuantMatrix {
    Intra,
    NonIntra,
}

/// `vop_time_increment` 的位宽: 表示 `resolution - 1` 所需位数, 至少 1 位
pub fn time_increment_bits(resolution: u16) -> u32 {
    let value = resolution.wrapping_sub(1);
    (u16::BITS - value.leading_zeros()).max(1)
}

/// 跳过 load_*_quant_mat 之后的量化矩阵
///
/// 第一个系数直接跳过, 之后逐个读取直到遇到 0 或读满 64 个.
/// 返回消耗的 8 位系数个数.
pub(crate) fn skip_quant_matrix(reader: &mut BitReader, matrix: QuantMatrix) -> M4vResult<u32> {
    reader.skip_bits(8)?;
    let mut value = reader.read_bits(8)?;
    let mut count = 2u32;
    while value != 0 && count < QUANT_MATRIX_COEFFS {
        value = reader.read_bits(8)?;
        count += 1;
    }
    debug!("{:?} 量化矩阵: 消耗 {} 个系数", matrix, count);
    Ok(count)
}

/// 解析 VOL 头部
///
/// `data` 从 VOL 起始码之后开始. 最后按 `policy` 校验 profile/level.
pub fn parse_vol_header(
    data: &[u8],
    limits: &DecodeLimits,
    policy: &ProfileLevelPolicy,
) -> M4vResult<VolHeaderInfo> {
    let mut reader = BitReader::new(data);

    // random_accessible_vol
    reader.skip_bits(1)?;
    let profile_and_level = reader.read_bits(8)? as u8;

    let mut version_id = 1u8;
    if reader.read_flag()? {
        // is_object_layer_identifier: verid + priority
        version_id = reader.read_bits(4)? as u8;
        reader.skip_bits(3)?;
    }

    let aspect_ratio_info = reader.read_bits(4)?;
    if aspect_ratio_info == EXTENDED_PAR {
        // par_width, par_height
        reader.skip_bits(16)?;
    }

    if reader.read_flag()? {
        // vol_control_parameters: chroma_format(2) + low_delay(1)
        reader.skip_bits(3)?;
        if reader.read_flag()? {
            reader.skip_bits(VBV_PARAMETERS_BITS)?;
        }
    }

    let shape = reader.read_bits(2)?;
    if shape != SHAPE_RECTANGULAR {
        error!("不支持非矩形 VOL shape: {}", shape);
        return Err(HeaderError::Unsupported(UnsupportedFeature::Shape(shape)));
    }

    reader.skip_bits(1)?;
    let time_increment_resolution = reader.read_bits(16)? as u16;
    let n_bits_time = time_increment_bits(time_increment_resolution);

    reader.skip_bits(1)?;
    let fixed_vop_rate = reader.read_flag()?;
    if fixed_vop_rate {
        // fixed_vop_time_increment
        reader.skip_bits(n_bits_time as usize)?;
    }

    reader.expect_marker("video_object_layer_width marker")?;
    let width = reader.read_bits(13)?;
    reader.expect_marker("video_object_layer_height marker")?;
    let height = reader.read_bits(13)?;
    let dimensions = PictureDimensions::new(width, height);

    // marker_bit, interlaced, obmc_disable
    reader.skip_bits(3)?;

    // verid=1 时 sprite_enable 为 1 位, 否则为 2 位
    let sprite_bits = if version_id == 1 { 1 } else { 2 };
    let sprite_enable = reader.read_bits(sprite_bits)?;
    if sprite_enable != 0 {
        error!("不支持 sprite 码流: sprite_enable={}", sprite_enable);
        return Err(HeaderError::Unsupported(UnsupportedFeature::Sprite(
            sprite_enable,
        )));
    }

    if reader.read_flag()? {
        // not_8_bit: quant_precision(4) + bits_per_pixel(4)
        reader.skip_bits(8)?;
    }

    let quant_type = reader.read_flag()?;
    if quant_type {
        if reader.read_flag()? {
            skip_quant_matrix(&mut reader, QuantMatrix::Intra)?;
        }
        if reader.read_flag()? {
            skip_quant_matrix(&mut reader, QuantMatrix::NonIntra)?;
        }
    }

    if version_id != 1 {
        // quarter_sample
        reader.skip_bits(1)?;
    }

    // complexity_estimation_disable, resync_marker_disable
    reader.skip_bits(2)?;

    let data_partitioned = reader.read_flag()?;
    if data_partitioned {
        let limit = limits.data_partitioned_max_area();
        if dimensions.area() > limit {
            error!("data_partitioned 码流仅支持 WVGA 及以下分辨率: {}", dimensions);
            return Err(HeaderError::ResolutionExceeded {
                width,
                height,
                limit,
            });
        }
    }

    debug!(
        "VOL: {}, verid={}, time_res={}, fixed_rate={}, data_partitioned={}",
        dimensions, version_id, time_increment_resolution, fixed_vop_rate, data_partitioned
    );

    policy.validate(profile_and_level)?;

    Ok(VolHeaderInfo {
        dimensions,
        profile_and_level,
        version_id,
        aspect_ratio_info: aspect_ratio_info as u8,
        time_increment_resolution,
        n_bits_time,
        fixed_vop_rate,
        quant_type,
        data_partitioned,
    })
}
