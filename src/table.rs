// src/table.rs
//! CSV persistence for the feature table and the intermediate dumps.
//!
//! The feature table is always written with its full header, even when it
//! has no rows, so downstream readers never see a missing or headerless file.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::features::DailyFeatureRow;
use crate::ingest::types::{LabeledEvent, RawEvent};

pub const FEATURE_COLUMNS: [&str; 10] = [
    "topic",
    "date",
    "fr_notice_count",
    "comment_rate_14d",
    "under_review_count",
    "econ_significant_flag",
    "wh_hits",
    "eo_hits_45d",
    "agency_diversity",
    "score",
];

const DATE_FMT: &str = "%Y-%m-%d";

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

fn feature_cells(r: &DailyFeatureRow, with_score: bool) -> Vec<String> {
    let mut cells = vec![
        r.topic.clone(),
        r.date.format(DATE_FMT).to_string(),
        r.fr_notice_count.to_string(),
        r.comment_rate_14d.to_string(),
        r.under_review_count.to_string(),
        r.econ_significant_flag.to_string(),
        r.wh_hits.to_string(),
        r.eo_hits_45d.to_string(),
        r.agency_diversity.to_string(),
    ];
    if with_score {
        cells.push(r.score.to_string());
    }
    cells
}

fn write_features<W: Write>(w: &mut W, rows: &[DailyFeatureRow], with_score: bool) -> io::Result<()> {
    let cols = if with_score {
        &FEATURE_COLUMNS[..]
    } else {
        &FEATURE_COLUMNS[..FEATURE_COLUMNS.len() - 1]
    };
    write_row(w, cols)?;

    let mut sorted: Vec<&DailyFeatureRow> = rows.iter().collect();
    sorted.sort_by(|a, b| a.topic.cmp(&b.topic).then(a.date.cmp(&b.date)));
    for r in sorted {
        write_row(w, &feature_cells(r, with_score))?;
    }
    Ok(())
}

/// Write the scored feature table, sorted by `(topic, date)`.
pub fn write_feature_table<W: Write>(w: &mut W, rows: &[DailyFeatureRow]) -> io::Result<()> {
    write_features(w, rows, true)
}

/// Same table without the `score` column.
pub fn write_pre_score_table<W: Write>(w: &mut W, rows: &[DailyFeatureRow]) -> io::Result<()> {
    write_features(w, rows, false)
}

pub fn write_raw_events<W: Write>(w: &mut W, events: &[RawEvent]) -> io::Result<()> {
    write_row(w, &["source", "id", "date", "title", "agency", "kind", "url"])?;
    for e in events {
        let date = e.date.format(DATE_FMT).to_string();
        write_row(
            w,
            &[
                e.source.code(),
                e.id.as_deref().unwrap_or_default(),
                date.as_str(),
                e.title.as_deref().unwrap_or_default(),
                e.agency.as_deref().unwrap_or_default(),
                e.kind.as_deref().unwrap_or_default(),
                e.url.as_deref().unwrap_or_default(),
            ],
        )?;
    }
    Ok(())
}

pub fn write_labeled_events<W: Write>(w: &mut W, events: &[LabeledEvent]) -> io::Result<()> {
    write_row(w, &["date", "topic", "source"])?;
    for e in events {
        let date = e.date.format(DATE_FMT).to_string();
        write_row(w, &[date.as_str(), e.topic.as_str(), e.source.code()])?;
    }
    Ok(())
}

/// Create parent dirs, write through a buffer, flush.
pub fn write_file<F>(path: &Path, f: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    f(&mut w).with_context(|| format!("writing {}", path.display()))?;
    w.flush().with_context(|| format!("flushing {}", path.display()))?;
    debug!(path = %path.display(), "file written");
    Ok(())
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Read a persisted feature table. Rows with an unparsable date are skipped;
/// unparsable numbers read as 0; a blank topic becomes "unknown".
pub fn read_feature_table(path: &Path) -> Result<Vec<DailyFeatureRow>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_feature_table(&text))
}

pub fn parse_feature_table(text: &str) -> Vec<DailyFeatureRow> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let col = |name: &str| header.iter().position(|h| h.trim() == name);
    let idx: Vec<Option<usize>> = FEATURE_COLUMNS.iter().map(|c| col(*c)).collect();

    let mut out = Vec::new();
    for r in rows {
        let get = |k: usize| idx[k].and_then(|i| r.get(i)).map(|s| s.trim()).unwrap_or_default();
        let Ok(date) = NaiveDate::parse_from_str(get(1), DATE_FMT) else {
            continue;
        };
        let topic = match get(0) {
            "" => "unknown".to_string(),
            t => t.to_string(),
        };
        let num = |k: usize| parse_count(get(k));
        out.push(DailyFeatureRow {
            topic,
            date,
            fr_notice_count: num(2),
            comment_rate_14d: num(3),
            under_review_count: num(4),
            econ_significant_flag: num(5),
            wh_hits: num(6),
            eo_hits_45d: num(7),
            agency_diversity: num(8),
            score: get(9).parse::<f64>().ok().filter(|x| x.is_finite()).unwrap_or(0.0),
        });
    }
    out
}

/// Counts may have been written as floats ("3.0") by other tools.
fn parse_count(s: &str) -> u32 {
    s.parse::<u32>()
        .ok()
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|x| x.is_finite() && *x >= 0.0)
                .map(|x| x as u32)
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(topic: &str, day: u32, score: f64) -> DailyFeatureRow {
        DailyFeatureRow {
            topic: topic.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            fr_notice_count: 1,
            comment_rate_14d: 2,
            under_review_count: 0,
            econ_significant_flag: 0,
            wh_hits: 0,
            eo_hits_45d: 3,
            agency_diversity: 1,
            score,
        }
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_feature_table(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "topic,date,fr_notice_count,comment_rate_14d,under_review_count,econ_significant_flag,wh_hits,eo_hits_45d,agency_diversity,score\n"
        );
    }

    #[test]
    fn rows_are_sorted_and_read_back() {
        let rows = vec![row("b", 1, 1.5), row("a", 2, 0.0), row("a", 1, 42.25)];
        let mut buf = Vec::new();
        write_feature_table(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("a,2025-01-01,"));
        assert!(lines[1].ends_with(",42.25"));
        assert!(lines[3].starts_with("b,"));

        let back = parse_feature_table(&text);
        assert_eq!(back.len(), 3);
        assert_eq!(back[0], row("a", 1, 42.25));
    }

    #[test]
    fn quoting_and_bad_rows() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["a,b", "say \"hi\"", "plain"]).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "\"a,b\",\"say \"\"hi\"\"\",plain\n");
        assert_eq!(
            parse_rows(std::str::from_utf8(&buf).unwrap()),
            vec![vec!["a,b".to_string(), "say \"hi\"".to_string(), "plain".to_string()]]
        );

        let text = "date,topic,score,fr_notice_count\r\nnot-a-date,x,1,1\r\n2025-01-05,,7.5,3.0\r\n";
        let rows = parse_feature_table(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic, "unknown");
        assert_eq!(rows[0].fr_notice_count, 3);
        assert_eq!(rows[0].score, 7.5);
    }
}
