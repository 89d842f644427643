//! 起始码扫描.
//!
//! 维护一个 32 位滑动窗口 (初值全 1), 每移入一个字节后检查
//! `(window & mask) == value`. 单次线性扫描, 不回退.

/// 起始码: 32 位大端滑动窗口上的 (掩码, 参考值) 对
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartCode {
    /// 名称 (仅用于日志)
    pub name: &'static str,
    pub mask: u32,
    pub value: u32,
}

impl StartCode {
    /// 检查窗口是否匹配
    #[inline]
    pub fn matches(&self, window: u32) -> bool {
        (window & self.mask) == self.value
    }
}

/// VOL 起始码: 00 00 01 20-2F
pub const VOL_START_CODE: StartCode = StartCode {
    name: "video_object_layer_start_code",
    mask: 0xFFFF_FFF0,
    value: 0x0000_0120,
};

/// Short Video Header 起始码: 22 位 0000 0000 0000 0000 1000 00
///
/// 按字节: 00 00 (1000 00xx), 第 4 个字节不参与匹配.
pub const SHORT_HEADER_START_CODE: StartCode = StartCode {
    name: "short_video_start_marker",
    mask: 0xFFFF_FC00,
    value: 0x0000_8000,
};

/// VOP 起始码: 00 00 01 B6
pub const VOP_START_CODE: StartCode = StartCode {
    name: "vop_start_code",
    mask: 0xFFFF_FFFF,
    value: 0x0000_01B6,
};

/// 查找起始码, 返回匹配字节之后的偏移
pub fn find_start_code(data: &[u8], code: &StartCode) -> Option<usize> {
    let mut window = 0xFFFF_FFFFu32;
    for (i, &byte) in data.iter().enumerate() {
        window = (window << 8) | u32::from(byte);
        if code.matches(window) {
            return Some(i + 1);
        }
    }
    None
}

/// 查找全部起始码, 返回每次匹配字节之后的偏移
///
/// 匹配后窗口重置, 相邻匹配不会共享字节.
pub fn find_all_start_codes(data: &[u8], code: &StartCode) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut window = 0xFFFF_FFFFu32;
    for (i, &byte) in data.iter().enumerate() {
        window = (window << 8) | u32::from(byte);
        if code.matches(window) {
            offsets.push(i + 1);
            window = 0xFFFF_FFFF;
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_vol_start_code() {
        let data = [0xFF, 0x00, 0x00, 0x01, 0x23, 0xAA];
        assert_eq!(find_start_code(&data, &VOL_START_CODE), Some(5));
    }

    #[test]
    fn test_vol_mask_rejects_other_codes() {
        // 00 00 01 B0 (VOS) 不是 VOL
        let data = [0x00, 0x00, 0x01, 0xB0, 0x00, 0x00, 0x01, 0x30];
        assert_eq!(find_start_code(&data, &VOL_START_CODE), None);
    }

    #[test]
    fn test_vop_at_final_bytes() {
        let data = [0x12, 0x34, 0x56, 0x00, 0x00, 0x01, 0xB6];
        assert_eq!(find_start_code(&data, &VOP_START_CODE), Some(data.len()));
    }

    #[test]
    fn test_seed_prevents_leading_match() {
        // 不足 4 字节时, 全 1 初值保证不会误匹配
        let data = [0x00, 0x01, 0xB6];
        assert_eq!(find_start_code(&data, &VOP_START_CODE), None);
        assert_eq!(find_start_code(&[], &VOP_START_CODE), None);
    }

    #[test]
    fn test_short_header_start_code() {
        // temporal_reference 高 2 位可为任意值
        let data = [0x00, 0x00, 0x83, 0x10];
        assert_eq!(find_start_code(&data, &SHORT_HEADER_START_CODE), Some(4));

        let data = [0x00, 0x00, 0x84, 0x10];
        assert_eq!(find_start_code(&data, &SHORT_HEADER_START_CODE), None);
    }

    #[test]
    fn test_find_all_vops() {
        let data = [
            0x00, 0x00, 0x01, 0xB6, 0x10, // VOP 1
            0x00, 0x00, 0x01, 0xB6, 0x20, // VOP 2
            0x00, 0x00, 0x01, 0xB3, // GOV
        ];
        assert_eq!(find_all_start_codes(&data, &VOP_START_CODE), vec![4, 9]);
    }
}
