use std::io::{self, Write};

/// 把一次精确匹配画成两行：参考序列，以及在匹配偏移处对齐的查询串。
///
/// ```text
///  reference  acgacaacgacg
///          6        acga
/// ```
pub fn write_alignment<W: Write>(out: &mut W, reference: &[u8], query: &[u8], offset: usize) -> io::Result<()> {
    writeln!(out, "{:>10}  {}", "reference", String::from_utf8_lossy(reference))?;
    writeln!(
        out,
        "{:>10}  {:pad$}{}",
        offset,
        "",
        String::from_utf8_lossy(query),
        pad = offset
    )
}

pub fn render_alignment(reference: &[u8], query: &[u8], offset: usize) -> String {
    let mut buf = Vec::new();
    // 写入 Vec 不会失败
    let _ = write_alignment(&mut buf, reference, query, offset);
    String::from_utf8_lossy(&buf).into_owned()
}
