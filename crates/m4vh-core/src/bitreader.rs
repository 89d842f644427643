//! 比特流读取器.
//!
//! 按大端位序 (MSB first) 从字节缓冲区读取任意宽度 (1-32 位) 的无符号字段.
//! 每次读取前都会检查剩余长度, 数据不足时返回 [`HeaderError::Truncated`],
//! 不会越过缓冲区末尾读取.

use crate::{HeaderError, M4vResult};

/// 比特流读取器
///
/// # 示例
/// ```
/// use m4vh_core::bitreader::BitReader;
///
/// let data = [0b10110001, 0b01010101];
/// let mut br = BitReader::new(&data);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.read_bits(12).unwrap(), 0b0001_0101_0101);
/// assert!(br.read_bits(1).is_err());
/// ```
pub struct BitReader<'a> {
    /// 源数据
    data: &'a [u8],
    /// 当前字节索引
    byte_pos: usize,
    /// 当前字节中的位位置 (0-7, 0 表示最高位)
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    /// 创建新的比特流读取器, 位置为 (0, 0)
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// 获取已读取的总位数
    pub fn bits_read(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    /// 获取剩余可读位数
    pub fn bits_left(&self) -> usize {
        if self.byte_pos >= self.data.len() {
            return 0;
        }
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }

    /// 获取当前字节位置
    pub fn byte_position(&self) -> usize {
        self.byte_pos
    }

    /// 获取当前字节内的位偏移 (0-7)
    pub fn bit_offset(&self) -> u8 {
        self.bit_pos
    }

    fn ensure(&self, n: usize) -> M4vResult<()> {
        let available = self.bits_left();
        if n > available {
            return Err(HeaderError::Truncated {
                needed: n,
                available,
            });
        }
        Ok(())
    }

    /// 推进 n 位, 位偏移进位到字节索引
    fn advance(&mut self, n: usize) {
        let total = self.bit_pos as usize + n;
        self.byte_pos += total / 8;
        self.bit_pos = (total % 8) as u8;
    }

    /// 读取 N 个位 (1-32 位)
    ///
    /// 从当前字节起装载 5 字节大端窗口 (越界部分补零, 长度检查保证补零位不会被返回),
    /// 右移 `40 - bit_pos - n` 后取低 N 位.
    pub fn read_bits(&mut self, n: u32) -> M4vResult<u32> {
        if n == 0 || n > 32 {
            return Err(HeaderError::InvalidArgument(format!(
                "read_bits: n={} 不在 1..=32 范围内",
                n,
            )));
        }
        self.ensure(n as usize)?;

        let mut window = 0u64;
        for i in 0..5 {
            let byte = self.data.get(self.byte_pos + i).copied().unwrap_or(0);
            window = (window << 8) | u64::from(byte);
        }

        let shift = 40 - u32::from(self.bit_pos) - n;
        let mask = (1u64 << n) - 1;
        let value = ((window >> shift) & mask) as u32;

        self.advance(n as usize);
        Ok(value)
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> M4vResult<u32> {
        self.read_bits(1)
    }

    /// 读取 1 位标志
    pub fn read_flag(&mut self) -> M4vResult<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// 读取 marker_bit, 其值必须为 1
    pub fn expect_marker(&mut self, field: &'static str) -> M4vResult<()> {
        if self.read_bits(1)? != 1 {
            return Err(HeaderError::MalformedMarker { field });
        }
        Ok(())
    }

    /// 跳过 N 个位 (不限于 32 位)
    pub fn skip_bits(&mut self, n: usize) -> M4vResult<()> {
        self.ensure(n)?;
        self.advance(n);
        Ok(())
    }
}
