use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{FmError, Result};
use crate::index::bwt::build_bwt;
use crate::index::config::IndexConfig;
use crate::index::occ::OccurrenceTable;
use crate::index::rank::RankIndex;
use crate::index::sa::build_sa;
use crate::index::ssa::SampledSuffixArray;
use crate::util::alphabet::{Alphabet, TERMINATOR_CODE};

/// 后缀数组上的半开行区间 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchInterval {
    pub start: usize,
    pub end: usize,
}

impl MatchInterval {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// 索引构建的附加信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexMeta {
    pub reference_source: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 每个字符的总数与 C 值
#[derive(Debug, Clone, Serialize)]
pub struct SymbolCount {
    pub symbol: char,
    pub total: usize,
    pub c: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// 含终止符的文本长度
    pub len: usize,
    pub alphabet: String,
    pub terminator: char,
    pub config: IndexConfig,
    pub checkpoints_per_symbol: usize,
    pub sampled_rows: usize,
    pub symbols: Vec<SymbolCount>,
    pub meta: IndexMeta,
}

/// FM 索引：
/// - rank 检查点（定长分块 + 块内顺扫补偿）与 C 表用于反向搜索；
/// - 只保留稀疏采样的后缀数组，定位时沿 LF 映射走到最近的采样行。
///
/// 构建完成后所有结构只读，可在多个线程间共享查询。
#[derive(Debug, Clone)]
pub struct FmIndex {
    alphabet: Alphabet,
    config: IndexConfig,
    rank: RankIndex,
    occ: OccurrenceTable,
    ssa: SampledSuffixArray,
    meta: IndexMeta,
}

/// 校验参考序列并编码；末尾已有终止符时直接使用，否则追加一个。
fn encode_reference(reference: &[u8], alphabet: &Alphabet) -> Result<Vec<u8>> {
    let terminator = alphabet.terminator();
    let body = match reference.split_last() {
        None => return Err(FmError::InvalidReference("reference is empty".to_string())),
        Some((&last, body)) if last == terminator => body,
        Some(_) => reference,
    };
    if body.is_empty() {
        return Err(FmError::InvalidReference("reference holds only the terminator".to_string()));
    }
    if body.len() >= u32::MAX as usize {
        return Err(FmError::InvalidReference(format!(
            "reference of {} symbols exceeds the supported length",
            body.len()
        )));
    }

    let mut text = Vec::with_capacity(body.len() + 1);
    for (i, &b) in body.iter().enumerate() {
        match alphabet.encode(b) {
            Some(TERMINATOR_CODE) => {
                return Err(FmError::InvalidReference(format!(
                    "terminator '{}' appears inside the reference at offset {}",
                    b.escape_ascii(),
                    i
                )))
            }
            Some(code) => text.push(code),
            None => {
                return Err(FmError::InvalidReference(format!(
                    "symbol '{}' at offset {} is not in the alphabet",
                    b.escape_ascii(),
                    i
                )))
            }
        }
    }
    text.push(TERMINATOR_CODE);
    Ok(text)
}

impl FmIndex {
    /// 构建索引：SA -> BWT -> {rank 检查点, C 表, 采样 SA}。
    /// 任一步失败都不会返回半成品索引。
    pub fn build(reference: &[u8], alphabet: &Alphabet, config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        let text = encode_reference(reference, alphabet)?;
        let n = text.len();
        let sigma = alphabet.sigma();
        log::debug!(
            "building FM index: n={}, sigma={}, stride={}, sa={:?}, sampling={:?}",
            n,
            sigma,
            config.stride,
            config.sa_algorithm,
            config.sampling
        );

        let sa = build_sa(&text, config.sa_algorithm);
        let bwt = build_bwt(&text, &sa);
        let ssa = SampledSuffixArray::build(&sa, config.stride, config.sampling);
        // 完整 SA 与原文本不再保留
        drop(sa);
        drop(text);

        let rank = RankIndex::build(bwt, sigma, config.stride);
        let occ = OccurrenceTable::from_totals((0..sigma).map(|c| rank.total(c as u8)));

        let idx = Self {
            alphabet: alphabet.clone(),
            config: *config,
            rank,
            occ,
            ssa,
            meta: IndexMeta {
                build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
                ..IndexMeta::default()
            },
        };
        idx.verify()?;
        log::info!(
            "FM index built: {} rows, {} checkpoints per symbol, {} sampled rows",
            idx.len(),
            idx.rank.num_checkpoints(),
            idx.ssa.len()
        );
        Ok(idx)
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        let build_timestamp = meta.build_timestamp.or_else(|| self.meta.build_timestamp.take());
        self.meta = IndexMeta { build_timestamp, ..meta };
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// 含终止符的文本长度 n
    #[inline]
    pub fn len(&self) -> usize {
        self.rank.len()
    }

    /// 构建成功的索引至少包含一个字符和终止符，恒为 false
    pub fn is_empty(&self) -> bool {
        self.rank.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn rank_index(&self) -> &RankIndex {
        &self.rank
    }

    pub fn occurrence_table(&self) -> &OccurrenceTable {
        &self.occ
    }

    pub fn sampled_sa(&self) -> &SampledSuffixArray {
        &self.ssa
    }

    /// 解码后的 BWT
    pub fn bwt(&self) -> Vec<u8> {
        self.decode(self.rank.bwt())
    }

    /// `bwt[0..=row]` 中字符 symbol 的出现次数；未知字符返回 0
    pub fn rank(&self, symbol: u8, row: usize) -> usize {
        self.alphabet.encode(symbol).map_or(0, |c| self.rank.rank(c, row))
    }

    /// C 表查询，未知字符落在相邻的区间边界上
    pub fn count_smaller(&self, symbol: u8) -> usize {
        self.occ.count(&self.alphabet, symbol)
    }

    /// LF 映射：从第 row 行跳到文本中左移一位的后缀所在行
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        let c = self.rank.symbol_at(row);
        self.occ.get(c) + self.rank.rank_before(c, row)
    }

    /// 对编码后的模式做反向搜索
    pub fn backward_search(&self, pattern: &[u8]) -> MatchInterval {
        let mut l = 0usize;
        let mut r = self.len();
        for &c in pattern.iter().rev() {
            let c0 = self.occ.get(c);
            l = c0 + self.rank.rank_before(c, l);
            r = c0 + self.rank.rank_before(c, r);
            if r <= l {
                return MatchInterval::empty();
            }
        }
        MatchInterval { start: l, end: r }
    }

    /// 查询串对应的行区间；空串或包含字母表外字符时返回空区间
    pub fn interval(&self, query: &[u8]) -> MatchInterval {
        if query.is_empty() {
            return MatchInterval::empty();
        }
        match self.alphabet.encode_query(query) {
            Some(pattern) => self.backward_search(&pattern),
            None => MatchInterval::empty(),
        }
    }

    /// 出现次数
    pub fn count(&self, query: &[u8]) -> usize {
        self.interval(query).len()
    }

    /// 行 -> (文本偏移, LF 步数)；row 越界时返回 None
    pub fn resolve_with_steps(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.len() {
            return None;
        }
        let mut row = row;
        let mut steps = 0usize;
        loop {
            if let Some(pos) = self.ssa.get(row) {
                return Some((pos + steps, steps));
            }
            // 该行后缀从偏移 0 开始
            if self.rank.symbol_at(row) == TERMINATOR_CODE {
                return Some((steps, steps));
            }
            row = self.lf(row);
            steps += 1;
        }
    }

    /// 行 -> 文本偏移
    pub fn resolve(&self, row: usize) -> Option<usize> {
        self.resolve_with_steps(row).map(|(pos, _)| pos)
    }

    /// 精确匹配的全部起始偏移。
    ///
    /// 结果按后缀数组行序排列（即匹配后缀的字典序），而非文本位置升序；
    /// 需要位置序的调用方须自行排序。
    pub fn search(&self, query: &[u8]) -> Vec<usize> {
        self.interval(query).rows().filter_map(|row| self.resolve(row)).collect()
    }

    /// 与 `search` 相同，但对空串与非法字符返回 `InvalidQuery`
    pub fn search_strict(&self, query: &[u8]) -> Result<Vec<usize>> {
        if query.is_empty() {
            return Err(FmError::InvalidQuery("query is empty".to_string()));
        }
        if let Some((i, &b)) = query
            .iter()
            .enumerate()
            .find(|&(_, &b)| self.alphabet.encode(b).map_or(true, |c| c == TERMINATOR_CODE))
        {
            return Err(FmError::InvalidQuery(format!(
                "symbol '{}' at position {} is not in the alphabet",
                b.escape_ascii(),
                i
            )));
        }
        Ok(self.search(query))
    }

    /// 并行批量查询，结果与输入一一对应
    pub fn search_batch<Q>(&self, queries: &[Q]) -> Vec<Vec<usize>>
    where
        Q: AsRef<[u8]> + Sync,
    {
        queries.par_iter().map(|q| self.search(q.as_ref())).collect()
    }

    /// 仅凭 BWT、C 表与 rank 检查点重建原文本（含末尾终止符）
    pub fn reconstruct(&self) -> Vec<u8> {
        let n = self.len();
        let mut text = vec![TERMINATOR_CODE; n];
        let mut row = 0usize;
        for pos in (0..n.saturating_sub(1)).rev() {
            text[pos] = self.rank.symbol_at(row);
            row = self.lf(row);
        }
        self.decode(&text)
    }

    /// 校验各结构之间的长度与计数一致性
    pub fn verify(&self) -> Result<()> {
        let n = self.len();
        self.rank.verify()?;
        self.occ.verify(n)?;
        if self.occ.sigma() != self.alphabet.sigma() {
            return Err(FmError::IndexCorruption(format!(
                "C table covers {} symbols, alphabet has {}",
                self.occ.sigma(),
                self.alphabet.sigma()
            )));
        }
        let terminators = self.rank.total(TERMINATOR_CODE);
        if terminators != 1 {
            return Err(FmError::IndexCorruption(format!(
                "BWT holds {} terminators, expected exactly one",
                terminators
            )));
        }
        // 两种采样策略下采样条目数都是 ceil(n / k)
        let expected = n.div_ceil(self.config.stride);
        if self.ssa.len() != expected {
            return Err(FmError::IndexCorruption(format!(
                "sampled suffix array holds {} entries, expected {}",
                self.ssa.len(),
                expected
            )));
        }
        Ok(())
    }

    pub fn stats(&self) -> IndexStats {
        let symbols = (0..self.alphabet.sigma() as u8)
            .filter_map(|code| {
                self.alphabet.decode(code).map(|b| SymbolCount {
                    symbol: b as char,
                    total: self.rank.total(code),
                    c: self.occ.get(code),
                })
            })
            .collect();
        IndexStats {
            len: self.len(),
            alphabet: String::from_utf8_lossy(self.alphabet.symbols()).into_owned(),
            terminator: self.alphabet.terminator() as char,
            config: self.config,
            checkpoints_per_symbol: self.rank.num_checkpoints(),
            sampled_rows: self.ssa.len(),
            symbols,
            meta: self.meta.clone(),
        }
    }

    fn decode(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().filter_map(|&c| self.alphabet.decode(c)).collect()
    }
}
