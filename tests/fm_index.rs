use fmx::index::bwt::{build_bwt, invert_bwt};
use fmx::index::sa::{build_sa, SaAlgorithm};
use fmx::index::ssa::SamplingPolicy;
use fmx::{Alphabet, FmError, FmIndex, IndexConfig};

const REFERENCE: &[u8] = b"acgacaacgacgtttcgcgctgcgatcgactgcaacgacaacgacg$";

fn dna_index(reference: &[u8], config: IndexConfig) -> FmIndex {
    FmIndex::build(reference, &Alphabet::dna(), &config).unwrap()
}

fn literal_occurrences(text: &[u8], pat: &[u8]) -> Vec<usize> {
    (0..=text.len().saturating_sub(pat.len()))
        .filter(|&i| text[i..].starts_with(pat))
        .collect()
}

fn lcg_reference(len: usize, seed: u32) -> Vec<u8> {
    let bases = *b"acgt";
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            bases[(x >> 16) as usize % 4]
        })
        .collect()
}

#[test]
fn short_reference_single_hit() {
    let fm = dna_index(b"acga$", IndexConfig::default());
    assert_eq!(fm.search(b"cg"), vec![1]);
}

#[test]
fn demo_reference_finds_every_acga() {
    let fm = dna_index(REFERENCE, IndexConfig::default());
    let hits = fm.search(b"acga");
    assert_eq!(hits.len(), 4);

    let mut sorted = hits.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 6, 34, 40]);
    assert_eq!(sorted, literal_occurrences(REFERENCE, b"acga"));
}

#[test]
fn hits_come_back_in_suffix_array_order() {
    let text: Vec<u8> = REFERENCE
        .iter()
        .map(|&b| Alphabet::dna().encode(b).unwrap())
        .collect();
    let sa = build_sa(&text, SaAlgorithm::Naive);

    let fm = dna_index(REFERENCE, IndexConfig::default());
    let hits = fm.search(b"acga");
    let expected: Vec<usize> = sa
        .iter()
        .map(|&p| p as usize)
        .filter(|&p| REFERENCE[p..].starts_with(b"acga"))
        .collect();
    assert_eq!(hits, expected);
    // 行序下 "acgaca..." 在 "acgacg..." 之前，不等于位置升序
    assert_ne!(hits, vec![0, 6, 34, 40]);
}

#[test]
fn unknown_symbols_yield_empty_results() {
    let fm = dna_index(REFERENCE, IndexConfig::default());
    for q in [&b"acgn"[..], &b"ACGA"[..], &b"$"[..], &b"a$"[..], &b""[..]] {
        assert!(fm.search(q).is_empty(), "query {:?}", String::from_utf8_lossy(q));
        assert_eq!(fm.count(q), 0);
    }
    // 失败的查询不影响后续查询
    assert_eq!(fm.count(b"acga"), 4);
}

#[test]
fn every_substring_is_found_at_its_offset() {
    let reference = lcg_reference(120, 7);
    for sampling in [SamplingPolicy::Row, SamplingPolicy::TextOffset] {
        for stride in [1usize, 4, 5, 32] {
            let cfg = IndexConfig { stride, sampling, ..IndexConfig::default() };
            let fm = dna_index(&reference, cfg);
            for i in 0..reference.len() {
                for len in 1..=(reference.len() - i).min(8) {
                    let hits = fm.search(&reference[i..i + len]);
                    assert!(hits.contains(&i), "offset {} len {} stride {}", i, len, stride);
                }
            }
        }
    }
}

#[test]
fn search_agrees_with_literal_scan() {
    let reference = lcg_reference(300, 99);
    let fm = dna_index(&reference, IndexConfig::with_stride(6));
    for len in [1usize, 2, 3, 6, 10] {
        for start in (0..reference.len() - len).step_by(7) {
            let pat = &reference[start..start + len];
            let mut hits = fm.search(pat);
            hits.sort_unstable();
            assert_eq!(hits, literal_occurrences(&reference, pat));
        }
    }
}

#[test]
fn sa_algorithms_build_identical_indexes() {
    let reference = lcg_reference(500, 3);
    let naive = dna_index(&reference, IndexConfig { sa_algorithm: SaAlgorithm::Naive, ..IndexConfig::default() });
    let doubling = dna_index(&reference, IndexConfig::default());
    assert_eq!(naive.bwt(), doubling.bwt());
    assert_eq!(naive.search(b"gat"), doubling.search(b"gat"));
}

#[test]
fn bwt_round_trip() {
    let fm = dna_index(REFERENCE, IndexConfig::default());
    assert_eq!(fm.reconstruct(), REFERENCE.to_vec());

    let text: Vec<u8> = REFERENCE.iter().map(|&b| Alphabet::dna().encode(b).unwrap()).collect();
    let bwt = build_bwt(&text, &build_sa(&text, SaAlgorithm::default()));
    assert_eq!(invert_bwt(&bwt), text);
}

#[test]
fn rank_and_c_table_laws() {
    let fm = dna_index(REFERENCE, IndexConfig::with_stride(3));
    let n = fm.len();
    for &sym in b"$acgt" {
        let mut prev = 0usize;
        for row in 0..n {
            let cur = fm.rank(sym, row);
            assert!(cur == prev || cur == prev + 1);
            prev = cur;
        }
    }
    let occ = fm.occurrence_table();
    let deltas: usize = (0..occ.sigma() as u8).map(|c| occ.get(c + 1) - occ.get(c)).sum();
    assert_eq!(deltas, n);
    assert_eq!(fm.count_smaller(b'$'), 0);
    assert_eq!(fm.count_smaller(b'~'), n);
}

#[test]
fn offset_sampling_resolves_within_stride() {
    for stride in [2usize, 4, 8] {
        let cfg = IndexConfig { stride, sampling: SamplingPolicy::TextOffset, ..IndexConfig::default() };
        let fm = dna_index(REFERENCE, cfg);
        for row in 0..fm.len() {
            let (_, steps) = fm.resolve_with_steps(row).unwrap();
            assert!(steps <= stride);
        }
    }
}

#[test]
fn custom_alphabet_and_terminator() {
    let alphabet = Alphabet::new(b"ACGTN", b'#').unwrap();
    let fm = FmIndex::build(b"NNACGTNACG#", &alphabet, &IndexConfig::default()).unwrap();
    let mut hits = fm.search(b"ACG");
    hits.sort_unstable();
    assert_eq!(hits, vec![2, 7]);
    assert!(fm.search(b"acg").is_empty());
}

#[test]
fn build_fails_fast_on_invalid_reference() {
    let a = Alphabet::dna();
    let cfg = IndexConfig::default();
    let err = FmIndex::build(b"acg$acg$", &a, &cfg).unwrap_err();
    assert!(matches!(err, FmError::InvalidReference(ref m) if m.contains("offset 3")));
    assert!(matches!(FmIndex::build(b"", &a, &cfg), Err(FmError::InvalidReference(_))));
    assert!(matches!(FmIndex::build(b"acgu", &a, &cfg), Err(FmError::InvalidReference(_))));
}

#[test]
fn index_is_shareable_across_threads() {
    let fm = std::sync::Arc::new(dna_index(REFERENCE, IndexConfig::default()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fm = std::sync::Arc::clone(&fm);
            std::thread::spawn(move || fm.count(b"acga"))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 4);
    }
}
