use serde::Serialize;

use crate::input::counts::SampleCounts;

/// Read categories reported by the counting step, in output column order.
pub const CATEGORIES: [&str; 7] = [
    "assigned",
    "no_feature",
    "ambiguous",
    "too_low_aQual",
    "not_aligned",
    "alignment_not_unique",
    "other",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountQc {
    pub assigned: u64,
    pub no_feature: u64,
    pub ambiguous: u64,
    pub too_low_aqual: u64,
    pub not_aligned: u64,
    pub alignment_not_unique: u64,
    pub other: u64,
}

impl CountQc {
    pub fn from_counts(counts: &SampleCounts) -> Self {
        let mut qc = CountQc {
            assigned: counts.assigned(),
            ..Default::default()
        };
        for (id, value) in &counts.pseudo {
            match id.trim_start_matches(crate::input::counts::PSEUDO_GENE_PREFIX) {
                "no_feature" => qc.no_feature += value,
                "ambiguous" => qc.ambiguous += value,
                "too_low_aQual" => qc.too_low_aqual += value,
                "not_aligned" => qc.not_aligned += value,
                "alignment_not_unique" => qc.alignment_not_unique += value,
                _ => qc.other += value,
            }
        }
        qc
    }

    pub fn total(&self) -> u64 {
        self.values().iter().sum()
    }

    pub fn values(&self) -> [u64; 7] {
        [
            self.assigned,
            self.no_feature,
            self.ambiguous,
            self.too_low_aqual,
            self.not_aligned,
            self.alignment_not_unique,
            self.other,
        ]
    }

    /// Fraction of all reads per category, zero when the file holds no reads.
    pub fn fractions(&self) -> [f64; 7] {
        let total = self.total();
        let mut out = [0.0; 7];
        if total == 0 {
            return out;
        }
        for (slot, value) in out.iter_mut().zip(self.values()) {
            *slot = value as f64 / total as f64;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/expr/qc.rs"]
mod tests;
