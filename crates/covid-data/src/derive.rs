//! Frame-level derived columns, computed per group.

use crate::frame::Frame;
use crate::transform::{self, AnchorSkipReason};
use chrono::NaiveDate;
use covid_common::Result;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Column written by [`epidemic_age_column`].
pub const EPIDEMIC_AGE: &str = "epidemic_age";

/// Suffix of the columns written by [`anchor_columns`].
pub const ANCHORED_SUFFIX: &str = "_anchored";

/// Name of the anchored form of `column`.
pub fn anchored_name(column: &str) -> String {
    format!("{column}{ANCHORED_SUFFIX}")
}

/// One group and column that could not be anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSkip {
    /// Group key.
    pub group: String,
    /// Source column.
    pub column: String,
    /// Reason.
    pub reason: AnchorSkipReason,
}

/// Outcome of [`anchor_columns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorReport {
    /// Output columns that were written.
    pub written: Vec<String>,
    /// Groups left undefined, per column.
    pub skipped: Vec<AnchorSkip>,
}

impl AnchorReport {
    /// Whether `group` was skipped for `column`.
    pub fn was_skipped(&self, group: &str, column: &str) -> bool {
        self.skipped
            .iter()
            .any(|skip| skip.group == group && skip.column == column)
    }
}

/// Full-length column assembled from the values `per_group` computes for
/// each group's time-sorted dates and `column` values.
fn map_groups<F>(
    frame: &Frame,
    by: &str,
    column: &str,
    mut per_group: F,
) -> Result<Vec<Option<f64>>>
where
    F: FnMut(&str, &[NaiveDate], &[Option<f64>]) -> Vec<Option<f64>>,
{
    let mut target = vec![None; frame.len()];
    for group in frame.groups(by)? {
        let times = frame.gather_time(&group.rows);
        let values = frame.gather(column, &group.rows)?;
        let derived = per_group(&group.key, &times, &values);
        for (&row, value) in group.rows.iter().zip(derived) {
            target[row] = value;
        }
    }
    Ok(target)
}

/// First-difference `column` inside each group into `output`. The first row
/// of each group gets `first`.
pub fn decumulate_column(
    frame: &mut Frame,
    by: &str,
    column: &str,
    output: &str,
    first: Option<f64>,
) -> Result<()> {
    let deltas = map_groups(frame, by, column, |_, _, values| {
        transform::decumulate_optional(values, first)
    })?;
    frame.set_values(output, deltas)
}

/// First-difference a frame that holds a single series sorted by time.
pub fn decumulate_series(
    frame: &mut Frame,
    column: &str,
    output: &str,
    first: Option<f64>,
) -> Result<()> {
    let deltas = transform::decumulate_optional(frame.values(column)?, first);
    frame.set_values(output, deltas)
}

/// Replace negative values of `column` by zero.
pub fn clip_negative(frame: &mut Frame, column: &str) -> Result<()> {
    let clipped = frame
        .values(column)?
        .iter()
        .map(|value| value.map(|v| v.max(0.0)))
        .collect();
    frame.set_values(column, clipped)
}

/// Write the `epidemic_age` column, in whole days since each group's
/// `column` first reached `threshold`. Returns the start of every group;
/// groups that never cross are logged and have undefined ages.
pub fn epidemic_age_column(
    frame: &mut Frame,
    by: &str,
    column: &str,
    threshold: f64,
) -> Result<BTreeMap<String, Option<NaiveDate>>> {
    let mut starts = BTreeMap::new();
    let ages = map_groups(frame, by, column, |key, times, values| {
        let start = transform::epidemic_start(times, values, threshold);
        if start.is_none() {
            warn!(group = key, threshold, column, "Group never reaches the epidemic threshold");
        }
        starts.insert(key.to_string(), start);
        ages_as_values(times, start)
    })?;
    frame.set_values(EPIDEMIC_AGE, ages)?;
    Ok(starts)
}

/// Epidemic age of a frame holding a single series sorted by time.
pub fn epidemic_age_series(
    frame: &mut Frame,
    column: &str,
    threshold: f64,
) -> Result<Option<NaiveDate>> {
    let start = transform::epidemic_start(frame.time(), frame.values(column)?, threshold);
    if start.is_none() {
        warn!(threshold, column, "Series never reaches the epidemic threshold");
    }
    let ages = ages_as_values(frame.time(), start);
    frame.set_values(EPIDEMIC_AGE, ages)?;
    Ok(start)
}

#[allow(clippy::cast_precision_loss)]
fn ages_as_values(times: &[NaiveDate], start: Option<NaiveDate>) -> Vec<Option<f64>> {
    transform::epidemic_ages(times, start)
        .into_iter()
        .map(|age| age.map(|days| days as f64))
        .collect()
}

/// Divide each of `columns` by the group's value on `anchor`, writing
/// `<column>_anchored`. Skipped groups hold undefined values; a column no
/// group could be anchored on is not written.
pub fn anchor_columns(
    frame: &mut Frame,
    by: &str,
    columns: &[&str],
    anchor: NaiveDate,
) -> Result<AnchorReport> {
    let mut report = AnchorReport::default();

    for &column in columns {
        let mut anchored_groups = 0_usize;
        let values = map_groups(frame, by, column, |key, times, values| {
            match transform::anchored(times, values, anchor) {
                Ok(ratios) => {
                    anchored_groups += 1;
                    ratios
                }
                Err(reason) => {
                    warn!(group = key, column, %anchor, %reason, "Skipping anchored ratio");
                    report.skipped.push(AnchorSkip {
                        group: key.to_string(),
                        column: column.to_string(),
                        reason,
                    });
                    vec![None; times.len()]
                }
            }
        })?;

        if anchored_groups == 0 {
            warn!(column, %anchor, "No group could be anchored, column not written");
            continue;
        }
        let output = anchored_name(column);
        debug!(column = %output, groups = anchored_groups, "Anchored column written");
        frame.set_values(output.clone(), values)?;
        report.written.push(output);
    }

    Ok(report)
}

/// `output = round(num / den * multiplier, decimals)` row by row.
pub fn ratio_column(
    frame: &mut Frame,
    num: &str,
    den: &str,
    output: &str,
    multiplier: f64,
    decimals: u32,
) -> Result<()> {
    let ratios = frame
        .values(num)?
        .iter()
        .zip(frame.values(den)?)
        .map(|(&n, &d)| transform::ratio(n, d, multiplier, decimals))
        .collect();
    frame.set_values(output, ratios)
}

/// Shift `column` by `lag` rows inside each group into `output`, padding
/// each group's head with `fill`.
pub fn lag_column(
    frame: &mut Frame,
    by: &str,
    column: &str,
    output: &str,
    lag: usize,
    fill: Option<f64>,
) -> Result<()> {
    let shifted = map_groups(frame, by, column, |_, _, values| {
        transform::lag(values, lag, fill)
    })?;
    frame.set_values(output, shifted)
}

/// `output = a - b - c...` row by row, undefined when any operand is.
pub fn difference_column(
    frame: &mut Frame,
    minuend: &str,
    subtrahends: &[&str],
    output: &str,
) -> Result<()> {
    let mut result: Vec<Option<f64>> = frame.values(minuend)?.to_vec();
    for &name in subtrahends {
        for (acc, value) in result.iter_mut().zip(frame.values(name)?) {
            *acc = match (*acc, value) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            };
        }
    }
    frame.set_values(output, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_common::test_utils::mock_date;

    fn two_groups() -> Frame {
        let dates: Vec<NaiveDate> = mock_date(2020, 2, 24).iter_days().take(3).collect();
        let mut time = dates.clone();
        time.extend(dates.iter().rev());
        Frame::new(time)
            .with_labels(
                "region",
                ["A", "A", "A", "B", "B", "B"].iter().map(ToString::to_string).collect(),
            )
            .unwrap()
            // B rows are stored newest first
            .with_values(
                "cases",
                vec![Some(50.0), Some(120.0), Some(200.0), Some(9.0), Some(0.0), Some(3.0)],
            )
            .unwrap()
    }

    #[test]
    fn test_decumulate_column_per_group() {
        let mut frame = two_groups();
        decumulate_column(&mut frame, "region", "cases", "new_cases", Some(0.0)).unwrap();
        assert_eq!(
            frame.values("new_cases").unwrap(),
            &[Some(0.0), Some(70.0), Some(80.0), Some(9.0), Some(-3.0), Some(0.0)]
        );
    }

    #[test]
    fn test_epidemic_age_column_reports_starts() {
        let mut frame = two_groups();
        let starts = epidemic_age_column(&mut frame, "region", "cases", 100.0).unwrap();

        assert_eq!(starts["A"], Some(mock_date(2020, 2, 25)));
        assert_eq!(starts["B"], None);
        assert_eq!(
            frame.values(EPIDEMIC_AGE).unwrap(),
            &[Some(-1.0), Some(0.0), Some(1.0), None, None, None]
        );
    }

    #[test]
    fn test_anchor_columns_reports_skips() {
        let mut frame = two_groups();
        let report =
            anchor_columns(&mut frame, "region", &["cases"], mock_date(2020, 2, 25)).unwrap();

        assert_eq!(report.written, vec!["cases_anchored".to_string()]);
        assert!(report.was_skipped("B", "cases"));
        assert_eq!(report.skipped[0].reason, AnchorSkipReason::ZeroAnchor);

        let anchored = frame.values("cases_anchored").unwrap();
        assert!((anchored[1].unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(anchored[3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_anchor_column_absent_when_nothing_anchors() {
        let mut frame = two_groups();
        let report =
            anchor_columns(&mut frame, "region", &["cases"], mock_date(2021, 1, 1)).unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(!frame.has_values("cases_anchored"));
    }

    #[test]
    fn test_ratio_and_clip() {
        let mut frame = two_groups();
        frame
            .set_values("den", vec![Some(3.0), Some(0.0), None, Some(1.0), Some(1.0), Some(1.0)])
            .unwrap();
        ratio_column(&mut frame, "cases", "den", "r", 1.0, 2).unwrap();
        assert_eq!(
            frame.values("r").unwrap(),
            &[Some(16.67), None, None, Some(9.0), Some(0.0), Some(3.0)]
        );

        frame
            .set_values("delta", vec![Some(-1.0), Some(2.0), None, Some(0.0), Some(-5.0), Some(1.0)])
            .unwrap();
        clip_negative(&mut frame, "delta").unwrap();
        assert_eq!(
            frame.values("delta").unwrap(),
            &[Some(0.0), Some(2.0), None, Some(0.0), Some(0.0), Some(1.0)]
        );
    }

    #[test]
    fn test_lag_column_per_group() {
        let mut frame = two_groups();
        lag_column(&mut frame, "region", "cases", "lagged", 1, Some(0.0)).unwrap();
        assert_eq!(
            frame.values("lagged").unwrap(),
            &[Some(0.0), Some(50.0), Some(120.0), Some(0.0), Some(3.0), Some(0.0)]
        );
    }
}
