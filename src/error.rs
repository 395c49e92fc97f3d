use thiserror::Error;

/// 索引构建与查询过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FmError {
    /// 字母表本身不合法（为空、重复字符、终止符混入字母表）
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// 索引参数不合法（如采样步长为 0）
    #[error("invalid index config: {0}")]
    InvalidConfig(String),

    /// 参考序列为空、终止符位置错误或包含字母表外字符
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// 仅由 `search_strict` 返回；`search` 对同样的输入返回空结果
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// 内部不变量被破坏，说明构建过程有缺陷
    #[error("index corruption: {0}")]
    IndexCorruption(String),
}

pub type Result<T> = std::result::Result<T, FmError>;
