use crate::error::{FmError, Result};

/// BWT 上的分块 rank 结构。
///
/// - 每隔 `stride` 个位置记录一次各字符的累计计数（检查点），
///   检查点 m 记录的是 `bwt[0..=m*stride]` 中的计数（含该位置本身）。
/// - 查询时从最近的前驱检查点出发，向前顺扫补足到目标行。
/// - 检查点按块展平存储：`checkpoints[m * sigma + c]`。
#[derive(Debug, Clone)]
pub struct RankIndex {
    sigma: usize,
    stride: usize,
    bwt: Vec<u8>,
    checkpoints: Vec<u32>,
    totals: Vec<u32>,
}

impl RankIndex {
    /// `bwt` 中的编码须小于 `sigma`，`stride` 须大于 0（由 `IndexConfig` 校验）。
    pub fn build(bwt: Vec<u8>, sigma: usize, stride: usize) -> Self {
        let n = bwt.len();
        let num_checkpoints = n.div_ceil(stride);
        let mut checkpoints = Vec::with_capacity(num_checkpoints * sigma);
        let mut running = vec![0u32; sigma];
        for (i, &ch) in bwt.iter().enumerate() {
            running[ch as usize] += 1;
            if i % stride == 0 {
                checkpoints.extend_from_slice(&running);
            }
        }
        Self { sigma, stride, bwt, checkpoints, totals: running }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn sigma(&self) -> usize {
        self.sigma
    }

    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    #[inline]
    pub fn symbol_at(&self, row: usize) -> u8 {
        self.bwt[row]
    }

    /// 每个字符的检查点个数，即 `ceil(n / stride)`
    pub fn num_checkpoints(&self) -> usize {
        self.checkpoints.len() / self.sigma
    }

    /// 字符 c 的检查点序列
    pub fn checkpoints(&self, c: u8) -> impl Iterator<Item = u32> + '_ {
        let c = c as usize;
        self.checkpoints.chunks_exact(self.sigma).map(move |block| block.get(c).copied().unwrap_or(0))
    }

    /// 字符 c 在整个 BWT 中的出现次数
    #[inline]
    pub fn total(&self, c: u8) -> usize {
        self.totals.get(c as usize).map_or(0, |&t| t as usize)
    }

    /// `bwt[0..=row]` 中 c 的出现次数（含 row 本身）。
    /// c 不在编码空间内时返回 0；row 超出末尾时按整个 BWT 计。
    #[inline]
    pub fn rank(&self, c: u8, row: usize) -> usize {
        let ci = c as usize;
        if ci >= self.sigma || self.bwt.is_empty() {
            return 0;
        }
        let row = row.min(self.bwt.len() - 1);
        let m = row / self.stride;
        let base = self.checkpoints[m * self.sigma + ci] as usize;
        let start = m * self.stride + 1;
        // row 恰为检查点位置时 start > row，切片为空
        let add = self.bwt[start..=row].iter().filter(|&&ch| ch == c).count();
        base + add
    }

    /// `bwt[0..pos)` 中 c 的出现次数，即 `rank(c, pos - 1)`；pos 为 0 时返回 0。
    #[inline]
    pub fn rank_before(&self, c: u8, pos: usize) -> usize {
        match pos {
            0 => 0,
            p => self.rank(c, p - 1),
        }
    }

    /// 校验检查点表的长度与计数一致性
    pub fn verify(&self) -> Result<()> {
        let n = self.bwt.len();
        let expected = n.div_ceil(self.stride);
        if self.checkpoints.len() != expected * self.sigma {
            return Err(FmError::IndexCorruption(format!(
                "checkpoint table holds {} entries, expected {} x {}",
                self.checkpoints.len(),
                expected,
                self.sigma
            )));
        }
        let sum: usize = self.totals.iter().map(|&t| t as usize).sum();
        if sum != n {
            return Err(FmError::IndexCorruption(format!(
                "symbol totals sum to {}, BWT length is {}",
                sum, n
            )));
        }
        if let Some(&ch) = self.bwt.iter().find(|&&ch| ch as usize >= self.sigma) {
            return Err(FmError::IndexCorruption(format!(
                "BWT holds code {} outside alphabet of size {}",
                ch, self.sigma
            )));
        }
        Ok(())
    }
}
