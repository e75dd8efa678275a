//! Trace-ready series cut out of frames.

use chrono::{Duration, NaiveDate};
use covid_common::Result;
use covid_data::{Aggregation, Frame, EPIDEMIC_AGE};
use tracing::warn;

/// Date format of the x values handed to plotly.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `date` as a plotly date string.
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `date` moved forward by `days`, as a plotly date string.
pub fn date_after(date: NaiveDate, days: i64) -> String {
    date_label(date + Duration::days(days))
}

/// One named line of a chart. Undefined values are serialized as `null`
/// and drawn as gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<X = String> {
    /// Trace name.
    pub name: String,
    /// Horizontal values.
    pub x: Vec<X>,
    /// Vertical values.
    pub y: Vec<Option<f64>>,
}

impl<X: Clone> Series<X> {
    /// Index and value of the last defined point.
    pub fn last_point(&self) -> Option<(usize, f64)> {
        self.y
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, v)| v.map(|v| (i, v)))
    }

    /// Largest defined value.
    pub fn max(&self) -> Option<f64> {
        self.y.iter().flatten().copied().reduce(f64::max)
    }

    /// Text labels empty everywhere but on the last defined point.
    pub fn last_point_text(&self, text: &str) -> Vec<String> {
        let last = self.last_point().map(|(i, _)| i);
        (0..self.y.len())
            .map(|i| if Some(i) == last { text.to_string() } else { String::new() })
            .collect()
    }

    /// Same series with `f` applied to every defined value.
    #[must_use]
    pub fn map_values(mut self, f: impl Fn(f64) -> f64) -> Self {
        for value in self.y.iter_mut().flatten() {
            *value = f(*value);
        }
        self
    }
}

/// Time-sorted rows of group `key` in label column `by`.
pub fn group_rows(frame: &Frame, by: &str, key: &str) -> Result<Option<Vec<usize>>> {
    Ok(frame
        .groups(by)?
        .into_iter()
        .find(|group| group.key == key)
        .map(|group| group.rows))
}

/// `column` over time for the given rows.
pub fn dated(frame: &Frame, rows: &[usize], column: &str, name: &str) -> Result<Series> {
    Ok(Series {
        name: name.to_string(),
        x: frame.gather_time(rows).into_iter().map(date_label).collect(),
        y: frame.gather(column, rows)?,
    })
}

/// `column` of a single-series frame over time.
pub fn whole(frame: &Frame, column: &str, name: &str) -> Result<Series> {
    let rows: Vec<usize> = (0..frame.len()).collect();
    dated(frame, &rows, column, name)
}

/// `column` over epidemic age for the given rows. Rows without an age, or
/// rejected by `keep(age, value)`, are dropped.
pub fn by_age<F>(
    frame: &Frame,
    rows: &[usize],
    column: &str,
    name: &str,
    keep: F,
) -> Result<Series<f64>>
where
    F: Fn(f64, Option<f64>) -> bool,
{
    let ages = frame.gather(EPIDEMIC_AGE, rows)?;
    let values = frame.gather(column, rows)?;
    let (x, y) = ages
        .into_iter()
        .zip(values)
        .filter_map(|(age, value)| age.filter(|&a| keep(a, value)).map(|a| (a, value)))
        .unzip();
    Ok(Series {
        name: name.to_string(),
        x,
        y,
    })
}

/// `column` over time for each of `groups`, in the given order. Groups
/// missing from the frame are logged and left out.
pub fn per_group(frame: &Frame, by: &str, groups: &[String], column: &str) -> Result<Vec<Series>> {
    let mut series = Vec::with_capacity(groups.len());
    for key in groups {
        match group_rows(frame, by, key)? {
            Some(rows) => series.push(dated(frame, &rows, column, key)?),
            None => warn!(group = %key, column, "Group not found in data, trace skipped"),
        }
    }
    Ok(series)
}

/// Per-date mean of `column` over every group of the frame.
pub fn mean_by_date(frame: &Frame, column: &str, name: &str) -> Result<Series> {
    let means = frame.aggregate_by_time(&[column], Aggregation::Mean)?;
    whole(&means, column, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_common::test_utils::mock_date;

    fn frame() -> Frame {
        let dates: Vec<NaiveDate> = mock_date(2020, 2, 24).iter_days().take(3).collect();
        let mut time = dates.clone();
        time.extend(dates);
        Frame::new(time)
            .with_labels(
                "region",
                ["A", "A", "A", "B", "B", "B"].iter().map(ToString::to_string).collect(),
            )
            .unwrap()
            .with_values(
                "v",
                vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(5.0)],
            )
            .unwrap()
            .with_values(
                EPIDEMIC_AGE,
                vec![Some(-1.0), Some(0.0), Some(1.0), None, None, None],
            )
            .unwrap()
    }

    #[test]
    fn test_last_point_skips_gaps() {
        let frame = frame();
        let rows = group_rows(&frame, "region", "A").unwrap().unwrap();
        let series = dated(&frame, &rows, "v", "A").unwrap();

        assert_eq!(series.x, vec!["2020-02-24", "2020-02-25", "2020-02-26"]);
        assert_eq!(series.last_point(), Some((1, 2.0)));
        assert_eq!(series.last_point_text("A"), vec!["", "A", ""]);
        assert_eq!(series.max(), Some(2.0));
    }

    #[test]
    fn test_by_age_filters_rows() {
        let frame = frame();
        let rows = group_rows(&frame, "region", "A").unwrap().unwrap();
        let series = by_age(&frame, &rows, "v", "A", |age, _| age >= 0.0).unwrap();
        assert_eq!(series.x, vec![0.0, 1.0]);
        assert_eq!(series.y, vec![Some(2.0), None]);

        let rows = group_rows(&frame, "region", "B").unwrap().unwrap();
        assert!(by_age(&frame, &rows, "v", "B", |_, _| true).unwrap().x.is_empty());
    }

    #[test]
    fn test_per_group_and_mean() {
        let frame = frame();
        let groups = vec!["B".to_string(), "C".to_string()];
        let series = per_group(&frame, "region", &groups, "v").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "B");

        let mean = mean_by_date(&frame, "v", "mean").unwrap();
        assert_eq!(mean.y, vec![Some(2.0), Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_date_after() {
        assert_eq!(date_after(mock_date(2020, 2, 25), 7), "2020-03-03");
    }
}
