use crate::util::alphabet::TERMINATOR_CODE;

/// 根据后缀数组构建 BWT：`bwt[i] = text[sa[i] - 1]`，`sa[i] == 0` 时为终止符。
/// text 为编码后的文本（0 为终止符）。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    sa.iter()
        .map(|&p| match p as usize {
            0 => TERMINATOR_CODE,
            i => text[i - 1],
        })
        .collect()
}

/// 由 BWT 逆推原文本（含末尾终止符）。
///
/// 从第 0 行（终止符后缀）出发反复做 LF 映射，每一步得到前一个字符，
/// 逆序写入即为原文本。使用完整的逐位 rank，仅用于校验与测试；
/// 基于采样结构的版本见 `FmIndex::reconstruct`。
pub fn invert_bwt(bwt: &[u8]) -> Vec<u8> {
    let n = bwt.len();
    if n == 0 {
        return Vec::new();
    }

    let mut counts = [0usize; 256];
    let mut lf = vec![0usize; n];
    // 先记下每行之前同字符的出现次数，再加上 C 值
    for (i, &ch) in bwt.iter().enumerate() {
        lf[i] = counts[ch as usize];
        counts[ch as usize] += 1;
    }
    let mut c = [0usize; 256];
    let mut acc = 0usize;
    for (slot, &cnt) in c.iter_mut().zip(counts.iter()) {
        *slot = acc;
        acc += cnt;
    }
    for (i, &ch) in bwt.iter().enumerate() {
        lf[i] += c[ch as usize];
    }

    let mut text = vec![TERMINATOR_CODE; n];
    let mut row = 0usize;
    // 第 0 行后缀为终止符本身，text[n-1] 已是终止符
    for pos in (0..n - 1).rev() {
        text[pos] = bwt[row];
        row = lf[row];
    }
    text
}
