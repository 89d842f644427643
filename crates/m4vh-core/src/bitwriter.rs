//! 比特流写入器.
//!
//! 按大端位序 (MSB first) 写入, 与 [`BitReader`](crate::BitReader) 对应.
//! 主要用于构造测试码流与基准数据.

/// 比特流写入器
///
/// # 示例
/// ```
/// use m4vh_core::bitwriter::BitWriter;
///
/// let mut bw = BitWriter::new();
/// bw.write_bits(0b1011, 4);
/// bw.write_bits(0b0001, 4);
/// bw.write_bits(0b01010101, 8);
/// assert_eq!(bw.finish(), vec![0b10110001, 0b01010101]);
/// ```
#[derive(Debug, Default)]
pub struct BitWriter {
    /// 输出缓冲区
    data: Vec<u8>,
    /// 当前字节 (正在填充)
    current_byte: u8,
    /// 当前字节中已填充的位数 (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// 创建新的比特流写入器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取已写入的总位数
    pub fn bits_written(&self) -> usize {
        self.data.len() * 8 + self.bit_count as usize
    }

    /// 写入 1 个位
    pub fn write_bit(&mut self, bit: u32) {
        self.current_byte = (self.current_byte << 1) | (bit & 1) as u8;
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.data.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// 写入标志位
    pub fn write_flag(&mut self, flag: bool) {
        self.write_bit(u32::from(flag));
    }

    /// 写入 N 个位 (最多 32 位), 值的低 N 位高位在前
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32, "write_bits: n={} 超过 32 位", n);
        for i in (0..n).rev() {
            self.write_bit((value >> i) & 1);
        }
    }

    /// 写入 N 个零位 (不限于 32 位)
    pub fn write_zeros(&mut self, n: usize) {
        for _ in 0..n {
            self.write_bit(0);
        }
    }

    /// 写入整字节序列
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_bits(u32::from(b), 8);
        }
    }

    /// 以 0 填充到字节边界
    pub fn align_to_byte(&mut self) {
        while self.bit_count != 0 {
            self.write_bit(0);
        }
    }

    /// 结束写入, 不足一字节的部分以 0 填充
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitReader;

    #[test]
    fn test_write_unaligned_fields() {
        let mut bw = BitWriter::new();
        bw.write_bits(0x20, 22);
        bw.write_bits(0x1FF, 9);
        assert_eq!(bw.bits_written(), 31);
        let data = bw.finish();
        assert_eq!(data.len(), 4);

        let mut br = BitReader::new(&data);
        assert_eq!(br.read_bits(22).unwrap(), 0x20);
        assert_eq!(br.read_bits(9).unwrap(), 0x1FF);
    }

    #[test]
    fn test_write_zeros_and_bytes() {
        let mut bw = BitWriter::new();
        bw.write_flag(true);
        bw.write_zeros(79);
        bw.write_bytes(&[0xAB]);
        let data = bw.finish();
        assert_eq!(data[0], 0x80);
        assert_eq!(data[10], 0xAB);
    }
}
