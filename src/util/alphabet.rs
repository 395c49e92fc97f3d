use crate::error::{FmError, Result};

/// 终止符的内部编码，字典序最小
pub const TERMINATOR_CODE: u8 = 0;
pub const DEFAULT_TERMINATOR: u8 = b'$';
pub const DNA_SYMBOLS: &[u8] = b"acgt";

const UNKNOWN: u8 = u8::MAX;
/// 编码 1..=254 留给字母表字符，255 表示未知
const MAX_SYMBOLS: usize = (UNKNOWN - 1) as usize;

/// 有序字母表 + 终止符。
///
/// 字符按字节升序编码为 `1..=len`，终止符固定编码为 0，
/// 因而编码后的字节序与 "终止符最小" 的字典序一致，与终止符原始字节值无关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    terminator: u8,
    codes: [u8; 256],
}

impl Alphabet {
    pub fn new(symbols: &[u8], terminator: u8) -> Result<Self> {
        if symbols.is_empty() {
            return Err(FmError::InvalidAlphabet("alphabet has no symbols".to_string()));
        }
        let mut sorted = symbols.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(FmError::InvalidAlphabet(format!(
                "duplicate symbol '{}'",
                w[0].escape_ascii()
            )));
        }
        if sorted.len() > MAX_SYMBOLS {
            return Err(FmError::InvalidAlphabet(format!(
                "at most {} symbols are supported, got {}",
                MAX_SYMBOLS,
                sorted.len()
            )));
        }
        if sorted.binary_search(&terminator).is_ok() {
            return Err(FmError::InvalidAlphabet(format!(
                "terminator '{}' is also an alphabet symbol",
                terminator.escape_ascii()
            )));
        }

        Ok(Self::from_sorted(sorted, terminator))
    }

    /// `{a, c, g, t}` + `$`
    pub fn dna() -> Self {
        Self::from_sorted(DNA_SYMBOLS.to_vec(), DEFAULT_TERMINATOR)
    }

    // 调用方保证 symbols 升序、无重复且不含终止符
    fn from_sorted(symbols: Vec<u8>, terminator: u8) -> Self {
        let mut codes = [UNKNOWN; 256];
        codes[terminator as usize] = TERMINATOR_CODE;
        for (i, &b) in symbols.iter().enumerate() {
            codes[b as usize] = (i + 1) as u8;
        }
        Self { symbols, terminator, codes }
    }

    /// 升序排列的字母表字符（不含终止符）
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// 编码空间大小：字母表字符数 + 1（终止符）
    #[inline]
    pub fn sigma(&self) -> usize {
        self.symbols.len() + 1
    }

    /// 字符 -> 编码；终止符编码为 0，未知字符返回 None
    #[inline]
    pub fn encode(&self, b: u8) -> Option<u8> {
        match self.codes[b as usize] {
            UNKNOWN => None,
            code => Some(code),
        }
    }

    /// 编码 -> 字符
    #[inline]
    pub fn decode(&self, code: u8) -> Option<u8> {
        match code {
            TERMINATOR_CODE => Some(self.terminator),
            c => self.symbols.get(c as usize - 1).copied(),
        }
    }

    /// 仅接受字母表字符（不含终止符），任一字符非法则返回 None
    pub fn encode_query(&self, query: &[u8]) -> Option<Vec<u8>> {
        query
            .iter()
            .map(|&b| self.encode(b).filter(|&c| c != TERMINATOR_CODE))
            .collect()
    }

    /// 字符在 "终止符 < 字母表" 顺序中的位置。
    ///
    /// 已知字符返回 `Ok(code)`；未知字符返回 `Err(code)`，
    /// 其中 `code` 为大于它的最小已知字符的编码（可能等于 `sigma()`，即超出所有字符）。
    pub fn position(&self, b: u8) -> std::result::Result<u8, u8> {
        if b == self.terminator {
            return Ok(TERMINATOR_CODE);
        }
        match self.symbols.binary_search(&b) {
            Ok(i) => Ok((i + 1) as u8),
            Err(i) => Err((i + 1) as u8),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_codes_follow_byte_order_with_terminator_first() {
        let a = Alphabet::dna();
        assert_eq!(a.sigma(), 5);
        assert_eq!(a.encode(b'$'), Some(0));
        assert_eq!(a.encode(b'a'), Some(1));
        assert_eq!(a.encode(b'c'), Some(2));
        assert_eq!(a.encode(b'g'), Some(3));
        assert_eq!(a.encode(b't'), Some(4));
        assert_eq!(a.encode(b'n'), None);
        assert_eq!(a.encode(b'A'), None);
        for code in 0..5u8 {
            let b = a.decode(code).unwrap();
            assert_eq!(a.encode(b), Some(code));
        }
        assert_eq!(a.decode(5), None);
    }

    #[test]
    fn terminator_sorts_first_even_with_large_byte_value() {
        let a = Alphabet::new(b"tgca", b'~').unwrap();
        assert_eq!(a.symbols(), b"acgt");
        assert_eq!(a.encode(b'~'), Some(TERMINATOR_CODE));
        assert!(a.encode(b'a').unwrap() > a.encode(b'~').unwrap());
    }

    #[test]
    fn rejects_malformed_alphabets() {
        assert!(matches!(Alphabet::new(b"", b'$'), Err(FmError::InvalidAlphabet(_))));
        assert!(matches!(Alphabet::new(b"acca", b'$'), Err(FmError::InvalidAlphabet(_))));
        assert!(matches!(Alphabet::new(b"ac$", b'$'), Err(FmError::InvalidAlphabet(_))));
    }

    #[test]
    fn encode_query_rejects_terminator_and_unknown() {
        let a = Alphabet::dna();
        assert_eq!(a.encode_query(b"acgt"), Some(vec![1, 2, 3, 4]));
        assert_eq!(a.encode_query(b"ac$"), None);
        assert_eq!(a.encode_query(b"acn"), None);
        assert_eq!(a.encode_query(b""), Some(vec![]));
    }

    #[test]
    fn position_of_unknown_symbol_is_next_greater_code() {
        let a = Alphabet::dna();
        assert_eq!(a.position(b'$'), Ok(0));
        assert_eq!(a.position(b'g'), Ok(3));
        // 'b' 位于 a 与 c 之间
        assert_eq!(a.position(b'b'), Err(2));
        // 'A' 小于所有字母表字符
        assert_eq!(a.position(b'A'), Err(1));
        // 'z' 大于所有字符
        assert_eq!(a.position(b'z'), Err(5));
    }
}
