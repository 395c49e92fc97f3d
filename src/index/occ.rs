use crate::error::{FmError, Result};
use crate::util::alphabet::Alphabet;

/// C 表：`c[a]` = BWT 中字典序严格小于 a 的字符总数。
///
/// 额外存一个哨兵 `c[sigma] = n`，使 "大于所有字符" 的查询也落在合法区间边界上。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceTable {
    c: Vec<usize>,
}

impl OccurrenceTable {
    /// totals 按编码顺序给出每个字符的出现次数（终止符在前）
    pub fn from_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut c = vec![0usize];
        let mut acc = 0usize;
        for t in totals {
            acc += t;
            c.push(acc);
        }
        Self { c }
    }

    /// 编码空间大小
    pub fn sigma(&self) -> usize {
        self.c.len() - 1
    }

    /// 总字符数 n
    pub fn total(&self) -> usize {
        self.c[self.c.len() - 1]
    }

    /// 按编码查询；超出编码空间时返回 n
    #[inline]
    pub fn get(&self, code: u8) -> usize {
        self.c[(code as usize).min(self.sigma())]
    }

    /// 按原始字符查询。
    ///
    /// 未知字符返回大于它的最小已知字符的 C 值（即小于它的字符总数），
    /// 超出所有已知字符时返回 n。
    pub fn count(&self, alphabet: &Alphabet, symbol: u8) -> usize {
        match alphabet.position(symbol) {
            Ok(code) | Err(code) => self.get(code),
        }
    }

    pub fn verify(&self, n: usize) -> Result<()> {
        if self.c[0] != 0 {
            return Err(FmError::IndexCorruption(format!(
                "C table starts at {}, expected 0",
                self.c[0]
            )));
        }
        if self.c.windows(2).any(|w| w[0] > w[1]) {
            return Err(FmError::IndexCorruption("C table is not monotone".to_string()));
        }
        if self.total() != n {
            return Err(FmError::IndexCorruption(format!(
                "C table totals {} symbols, BWT length is {}",
                self.total(),
                n
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // acga$ 的 BWT 计数：$ 1, a 2, c 1, g 1, t 0
    fn acga_table() -> OccurrenceTable {
        OccurrenceTable::from_totals([1, 2, 1, 1, 0])
    }

    #[test]
    fn c_values_are_cumulative() {
        let occ = acga_table();
        assert_eq!(occ.sigma(), 5);
        assert_eq!(occ.get(0), 0);
        assert_eq!(occ.get(1), 1);
        assert_eq!(occ.get(2), 3);
        assert_eq!(occ.get(3), 4);
        assert_eq!(occ.get(4), 5);
        assert_eq!(occ.get(5), 5);
        assert_eq!(occ.get(200), 5);
        occ.verify(5).unwrap();
    }

    #[test]
    fn count_by_symbol_including_unknown() {
        let occ = acga_table();
        let a = Alphabet::dna();
        assert_eq!(occ.count(&a, b'$'), 0);
        assert_eq!(occ.count(&a, b'a'), 1);
        assert_eq!(occ.count(&a, b'g'), 4);
        // 'b' 介于 a 与 c 之间：等于 c 的 C 值
        assert_eq!(occ.count(&a, b'b'), occ.count(&a, b'c'));
        // 'z' 超出所有字符
        assert_eq!(occ.count(&a, b'z'), 5);
    }

    #[test]
    fn deltas_sum_to_n() {
        let occ = acga_table();
        let sum: usize = (0..occ.sigma() as u8).map(|c| occ.get(c + 1) - occ.get(c)).sum();
        assert_eq!(sum, 5);
    }

    #[test]
    fn verify_detects_wrong_total() {
        let occ = acga_table();
        assert!(matches!(occ.verify(6), Err(FmError::IndexCorruption(_))));
    }
}
