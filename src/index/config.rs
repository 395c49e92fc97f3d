use serde::Serialize;

use crate::error::{FmError, Result};
use crate::index::sa::SaAlgorithm;
use crate::index::ssa::SamplingPolicy;

/// 默认检查点 / 采样步长
pub const DEFAULT_STRIDE: usize = 4;

/// 索引构建参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexConfig {
    /// rank 检查点与后缀数组采样共用的步长 k
    pub stride: usize,
    pub sa_algorithm: SaAlgorithm,
    pub sampling: SamplingPolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            sa_algorithm: SaAlgorithm::default(),
            sampling: SamplingPolicy::default(),
        }
    }
}

impl IndexConfig {
    pub fn with_stride(stride: usize) -> Self {
        Self { stride, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(FmError::InvalidConfig("stride must be at least 1".to_string()));
        }
        if self.stride > u32::MAX as usize {
            return Err(FmError::InvalidConfig(format!("stride {} is too large", self.stride)));
        }
        Ok(())
    }
}
