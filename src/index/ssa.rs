use serde::Serialize;

/// 后缀数组采样策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// 保留行号为 stride 整数倍的行
    #[default]
    Row,
    /// 保留文本偏移为 stride 整数倍的行，定位时 LF 步数不超过 stride
    TextOffset,
}

/// 稀疏后缀数组：只保留部分行的 `行 -> 文本偏移` 映射。
#[derive(Debug, Clone)]
pub struct SampledSuffixArray {
    policy: SamplingPolicy,
    stride: usize,
    /// TextOffset 策略下被采样的行号（升序）；Row 策略下为空
    rows: Vec<u32>,
    /// 与采样行一一对应的文本偏移
    offsets: Vec<u32>,
}

impl SampledSuffixArray {
    pub fn build(sa: &[u32], stride: usize, policy: SamplingPolicy) -> Self {
        let (rows, offsets) = match policy {
            SamplingPolicy::Row => (Vec::new(), sa.iter().step_by(stride).copied().collect()),
            SamplingPolicy::TextOffset => sa
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p as usize % stride == 0)
                .map(|(row, &p)| (row as u32, p))
                .unzip(),
        };
        Self { policy, stride, rows, offsets }
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// 采样条目数
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// 该行被采样时返回其文本偏移
    #[inline]
    pub fn get(&self, row: usize) -> Option<usize> {
        match self.policy {
            SamplingPolicy::Row => {
                if row % self.stride != 0 {
                    return None;
                }
                self.offsets.get(row / self.stride).map(|&p| p as usize)
            }
            SamplingPolicy::TextOffset => self
                .rows
                .binary_search(&(row as u32))
                .ok()
                .map(|i| self.offsets[i] as usize),
        }
    }
}
