use super::*;
use crate::input::toc::SampleKey;

fn matrix(rows: &[&[u64]]) -> CountMatrix {
    let n_genes = rows[0].len();
    CountMatrix {
        genes: (0..n_genes).map(|g| format!("G{g}")).collect(),
        samples: (0..rows.len())
            .map(|s| SampleKey::new("P", format!("S{s}")))
            .collect(),
        counts: rows.iter().map(|r| r.to_vec()).collect(),
        qc: Vec::new(),
    }
}

#[test]
fn filter_keeps_genes_reaching_min_count() {
    let m = matrix(&[&[0, 10, 9, 50], &[0, 0, 9, 50]]);
    let norm = Normalization::default();
    assert_eq!(filter_genes(&m, &norm), vec![1, 3]);

    let strict = Normalization {
        min_samples: 2,
        ..Normalization::default()
    };
    assert_eq!(filter_genes(&m, &strict), vec![3]);
}

#[test]
fn scale_factor_uses_counts_above_upper_quartile() {
    let counts = [1u64, 2, 3, 4, 100];
    let kept = [0, 1, 2, 3, 4];
    let norm = Normalization::default();
    let factor = scale_factor(&counts, &kept, &norm);
    assert!((factor - 1e6 / 101.0).abs() < 1e-9);
}

#[test]
fn scale_factor_falls_back_to_library_size() {
    let counts = [5u64, 5, 5, 5];
    let kept = [0, 1, 2, 3];
    let factor = scale_factor(&counts, &kept, &Normalization::default());
    assert!((factor - 1e6 / 21.0).abs() < 1e-9);
}

#[test]
fn zero_counts_give_finite_values() {
    let counts = [0u64; 4];
    let kept = [0, 1, 2, 3];
    let norm = Normalization::default();
    let factor = scale_factor(&counts, &kept, &norm);
    assert!(factor.is_finite());
    let value = lcpm(0, factor, norm.prior);
    assert!(value.is_finite());
    assert!((value - (0.5f64 * 1e6).log2()).abs() < 1e-9);
}

#[test]
fn lcpm_is_monotone_in_count() {
    let f = 2.0;
    assert!(lcpm(1, f, 0.5) < lcpm(2, f, 0.5));
    assert!((lcpm(3, 1.0, 1.0) - 2.0).abs() < 1e-12);
}
