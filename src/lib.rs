//! # fmx
//!
//! 面向小字母表参考序列（核苷酸 + 终止符）的 FM 索引精确子串定位。
//!
//! 本 crate 提供：
//!
//! - **后缀数组构建**：朴素比较排序与倍增法两种实现，输出一致
//! - **BWT**：由后缀数组导出，并可经 LF 映射逆推回原文本
//! - **rank 检查点**：每隔 k 个位置记录各字符累计计数，查询时就近顺扫
//! - **C 表**：字典序更小字符的累计计数，未知字符落在相邻区间边界
//! - **反向搜索**：从右到左逐字符收缩后缀数组行区间
//! - **定位**：稀疏采样后缀数组 + LF 回溯得到文本偏移
//!
//! ## 快速示例
//!
//! ```rust
//! use fmx::index::{FmIndex, IndexConfig};
//! use fmx::util::alphabet::Alphabet;
//!
//! let reference = b"acgacaacgacgtttcgcgctgcgatcgactgcaacgacaacgacg";
//! let fm = FmIndex::build(reference, &Alphabet::dna(), &IndexConfig::default()).unwrap();
//!
//! // 结果按后缀数组行序返回，需要位置序时自行排序
//! let mut hits = fm.search(b"acga");
//! hits.sort_unstable();
//! assert_eq!(hits, vec![0, 6, 34, 40]);
//!
//! // 字母表外字符得到空结果
//! assert!(fm.search(b"acgn").is_empty());
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀数组、BWT、rank 检查点、C 表、采样后缀数组与 FM 索引
//! - [`util`] — 字母表编码、匹配结果的文本渲染
//! - [`io`] — FASTA 解析
//! - [`error`] — 错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod util;

pub use error::FmError;
pub use index::{FmIndex, IndexConfig, MatchInterval};
pub use util::alphabet::Alphabet;
