// src/scoring.rs
//! Momentum score: a fixed, hand-tuned blend of per-topic z-scores and raw
//! indicators, clipped to [0, 100].
//!
//! score = 20·z(fr_notice_count) + 25·z(comment_rate_14d)
//!       + 15·under_review_count + 10·econ_significant_flag
//!       + 15·eo_hits_45d + 5·agency_diversity
//!
//! z-scores can be negative, so the blend is not a probability; the clip is
//! for presentation only.

use crate::features::DailyFeatureRow;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Blend weights. `Default` is the production heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub z_fr_notice: f64,
    pub z_comment_rate: f64,
    pub under_review: f64,
    pub econ_significant: f64,
    pub eo_hits_45d: f64,
    pub agency_diversity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            z_fr_notice: 20.0,
            z_comment_rate: 25.0,
            under_review: 15.0,
            econ_significant: 10.0,
            eo_hits_45d: 15.0,
            agency_diversity: 5.0,
        }
    }
}

/// Population z-score. A series with zero variance (constant, single point,
/// or empty) maps to all zeros.
pub fn zscore(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let var = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let sd = var.sqrt();
    if !sd.is_finite() || sd <= f64::EPSILON * mean.abs().max(1.0) {
        return vec![0.0; series.len()];
    }
    series.iter().map(|x| (x - mean) / sd).collect()
}

/// Per-row inputs to the blend, after standardization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    pub z_fr_notice: f64,
    pub z_comment_rate: f64,
    pub under_review: f64,
    pub econ_significant: f64,
    pub eo_hits_45d: f64,
    pub agency_diversity: f64,
}

impl ScoreInputs {
    /// Weighted blend clipped to [0, 100]. Non-finite inputs count as 0.
    pub fn blend(&self, w: &ScoreWeights) -> f64 {
        fn f(x: f64) -> f64 {
            if x.is_finite() {
                x
            } else {
                0.0
            }
        }
        let raw = w.z_fr_notice * f(self.z_fr_notice)
            + w.z_comment_rate * f(self.z_comment_rate)
            + w.under_review * f(self.under_review)
            + w.econ_significant * f(self.econ_significant)
            + w.eo_hits_45d * f(self.eo_hits_45d)
            + w.agency_diversity * f(self.agency_diversity);
        if raw.is_nan() {
            return SCORE_MIN;
        }
        raw.clamp(SCORE_MIN, SCORE_MAX)
    }
}

/// Score a feature table with the default weights.
pub fn score_features(rows: Vec<DailyFeatureRow>) -> Vec<DailyFeatureRow> {
    score_features_with(rows, &ScoreWeights::default())
}

/// Score every row. Standardization is per topic, never across topics.
/// Rows of one topic need not be contiguous; output keeps input order.
pub fn score_features_with(mut rows: Vec<DailyFeatureRow>, w: &ScoreWeights) -> Vec<DailyFeatureRow> {
    let mut by_topic: std::collections::BTreeMap<String, Vec<usize>> = Default::default();
    for (i, r) in rows.iter().enumerate() {
        by_topic.entry(r.topic.clone()).or_default().push(i);
    }

    for idxs in by_topic.values() {
        let fr: Vec<f64> = idxs.iter().map(|&i| f64::from(rows[i].fr_notice_count)).collect();
        let cr: Vec<f64> = idxs.iter().map(|&i| f64::from(rows[i].comment_rate_14d)).collect();
        let z_fr = zscore(&fr);
        let z_cr = zscore(&cr);

        for (k, &i) in idxs.iter().enumerate() {
            let r = &rows[i];
            let inputs = ScoreInputs {
                z_fr_notice: z_fr[k],
                z_comment_rate: z_cr[k],
                under_review: f64::from(r.under_review_count),
                econ_significant: f64::from(r.econ_significant_flag),
                eo_hits_45d: f64::from(r.eo_hits_45d),
                agency_diversity: f64::from(r.agency_diversity),
            };
            rows[i].score = inputs.blend(w);
        }
    }
    rows
}
