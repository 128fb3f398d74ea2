// src/summary.rs
//! Topic summarizer: latest value, 30-day change and the 90-day trend line
//! derived from a scored feature table.
//!
//! Unlike the feature table, the trend is sparse: a day with no rows is left
//! out, never reported as zero.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::features::DailyFeatureRow;

pub const CHANGE_LOOKBACK_DAYS: u64 = 30;
pub const TREND_DAYS: u64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub title: String,
    pub topic: String,
    pub score: f64,
    pub date: String,
    pub change_30d: f64,
    pub fr_notices: f64,
    pub comment_rate_14d: f64,
    pub under_review: u32,
    pub econ_significant: bool,
    pub white_house_hits: f64,
    pub executive_order_hits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaperVectorSummary {
    pub topics: Vec<TopicSummary>,
    pub trend: Vec<TrendPoint>,
}

fn round2(x: f64) -> f64 {
    if x.is_finite() {
        (x * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// `"grid_reliability"` -> `"Grid Reliability"`.
pub fn display_title(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut prev_alpha = false;
    for ch in topic.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn topic_summary(rows: &[&DailyFeatureRow]) -> Option<TopicSummary> {
    let latest = *rows.last()?;
    let target = latest.date.checked_sub_days(Days::new(CHANGE_LOOKBACK_DAYS));
    let baseline = target
        .and_then(|t| rows.iter().rev().find(|r| r.date <= t))
        .copied()
        .unwrap_or(latest);

    Some(TopicSummary {
        title: display_title(&latest.topic),
        topic: latest.topic.clone(),
        score: round2(latest.score),
        date: latest.date.format("%Y-%m-%d").to_string(),
        change_30d: round2(latest.score - baseline.score),
        fr_notices: f64::from(latest.fr_notice_count),
        comment_rate_14d: f64::from(latest.comment_rate_14d),
        under_review: latest.under_review_count,
        econ_significant: latest.econ_significant_flag != 0,
        white_house_hits: f64::from(latest.wh_hits),
        executive_order_hits: f64::from(latest.eo_hits_45d),
    })
}

/// Summarize a scored table. Rows may arrive in any order.
pub fn summarize(rows: &[DailyFeatureRow], top_n: usize) -> PaperVectorSummary {
    if rows.is_empty() {
        return PaperVectorSummary::default();
    }

    let mut by_topic: BTreeMap<&str, Vec<&DailyFeatureRow>> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for r in rows {
        by_topic.entry(r.topic.as_str()).or_default().push(r);
        let slot = by_day.entry(r.date).or_default();
        slot.0 += if r.score.is_finite() { r.score } else { 0.0 };
        slot.1 += 1;
    }

    let mut topics: Vec<TopicSummary> = by_topic
        .into_values()
        .filter_map(|mut v| {
            v.sort_by_key(|r| r.date);
            topic_summary(&v)
        })
        .collect();
    topics.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.topic.cmp(&b.topic)));
    topics.truncate(top_n);

    let trend = match by_day.keys().next_back() {
        Some(&max) => {
            let min = max.checked_sub_days(Days::new(TREND_DAYS)).unwrap_or(NaiveDate::MIN);
            by_day
                .range(min..)
                .map(|(d, (sum, n))| TrendPoint {
                    date: d.format("%Y-%m-%d").to_string(),
                    score: round2(sum / f64::from(*n)),
                })
                .collect()
        }
        None => Vec::new(),
    };

    PaperVectorSummary { topics, trend }
}

pub fn write_summary_json(path: &Path, summary: &PaperVectorSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(summary).context("serializing summary")?;
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}
