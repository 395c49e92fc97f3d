use std::cmp::Ordering;

use serde::Serialize;

/// 后缀数组构建算法，两者输出完全一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaAlgorithm {
    /// (后缀, 偏移) 记录数组 + 字典序比较器排序
    Naive,
    /// 倍增法
    #[default]
    PrefixDoubling,
}

/// 构建后缀数组。
/// 输入为编码后的文本（0 为终止符，且只出现在末尾），每个后缀都取到文本真正的末尾。
pub fn build_sa(text: &[u8], algo: SaAlgorithm) -> Vec<u32> {
    match algo {
        SaAlgorithm::Naive => build_sa_naive(text),
        SaAlgorithm::PrefixDoubling => build_sa_doubling(text),
    }
}

/// 单个后缀记录：后缀内容及其在文本中的起始偏移
struct Suffix<'a> {
    suffix: &'a [u8],
    offset: u32,
}

fn by_suffix(a: &Suffix<'_>, b: &Suffix<'_>) -> Ordering {
    a.suffix.cmp(b.suffix)
}

/// 朴素实现：O(n^2 log n) 比较排序，适合短参考序列。
pub fn build_sa_naive(text: &[u8]) -> Vec<u32> {
    let mut suffixes: Vec<Suffix<'_>> = (0..text.len())
        .map(|i| Suffix { suffix: &text[i..], offset: i as u32 })
        .collect();
    // 终止符唯一，所有后缀互不相同，无需稳定排序
    suffixes.sort_unstable_by(by_suffix);
    suffixes.into_iter().map(|s| s.offset).collect()
}

/// 倍增法，O(n log^2 n)。
pub fn build_sa_doubling(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i32> = text.iter().map(|&b| b as i32).collect();
    let mut tmp: Vec<i32> = vec![0; n];

    let mut k = 1usize;
    loop {
        let key = |i: usize| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by_key(|&i| key(i));

        tmp[sa[0]] = 0;
        for i in 1..n {
            let a = sa[i - 1];
            let b = sa[i];
            tmp[b] = tmp[a] + i32::from(key(a) != key(b));
        }

        rank.copy_from_slice(&tmp);
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_text(len: usize, sigma: u32) -> Vec<u8> {
        let mut x: u32 = 1_234_567;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((x >> 16) % sigma) as u8 + 1);
        }
        v.push(0);
        v
    }

    #[test]
    fn sa_basic() {
        // 文本：a c g t $  -> 1 2 3 4 0
        let text = [1u8, 2, 3, 4, 0];
        // 期望：后缀按字典序：$, a..., c..., g..., t$
        assert_eq!(build_sa_naive(&text), vec![4, 0, 1, 2, 3]);
        assert_eq!(build_sa_doubling(&text), vec![4, 0, 1, 2, 3]);
    }

    #[test]
    fn sa_includes_terminator_suffix_in_comparison() {
        // a c g a $ ：后缀 "a$" 必须排在 "acga$" 之前
        let text = [1u8, 2, 3, 1, 0];
        assert_eq!(build_sa_naive(&text), vec![4, 3, 0, 1, 2]);
    }

    #[test]
    fn doubling_matches_naive_on_random_texts() {
        for len in 0..=64 {
            for sigma in [1u32, 2, 4] {
                let text = make_text(len, sigma);
                assert_eq!(
                    build_sa_doubling(&text),
                    build_sa_naive(&text),
                    "mismatch on len={} sigma={}",
                    len,
                    sigma
                );
            }
        }
    }

    #[test]
    fn sa_is_permutation_with_increasing_suffixes() {
        let text = make_text(200, 4);
        let sa = build_sa(&text, SaAlgorithm::default());
        let mut seen = vec![false; text.len()];
        for &p in &sa {
            assert!(!seen[p as usize]);
            seen[p as usize] = true;
        }
        for w in sa.windows(2) {
            assert!(text[w[0] as usize..] < text[w[1] as usize..]);
        }
    }

    #[test]
    fn empty_text_gives_empty_sa() {
        assert!(build_sa(&[], SaAlgorithm::Naive).is_empty());
        assert!(build_sa(&[], SaAlgorithm::PrefixDoubling).is_empty());
    }
}
