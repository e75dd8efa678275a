//! Columnar table of dated rows.

use chrono::NaiveDate;
use covid_common::{ReportError, Result};
use std::collections::{BTreeMap, HashMap};

/// Name of the date column every frame carries.
pub const TIME: &str = "time";

/// A table with one date column, text label columns and optional numeric
/// columns. All columns have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    time: Vec<NaiveDate>,
    labels: BTreeMap<String, Vec<String>>,
    values: BTreeMap<String, Vec<Option<f64>>>,
}

/// Rows sharing a label value, sorted by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Label value shared by the rows.
    pub key: String,
    /// Row indices into the frame, in time order.
    pub rows: Vec<usize>,
}

/// Per-date aggregation of numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Sum of the defined values.
    Sum,
    /// Mean of the defined values.
    Mean,
}

impl Frame {
    /// Frame with the given dates and no other columns.
    pub fn new(time: Vec<NaiveDate>) -> Self {
        Self {
            time,
            labels: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The date column.
    pub fn time(&self) -> &[NaiveDate] {
        &self.time
    }

    /// Builder form of [`Frame::set_labels`].
    pub fn with_labels(mut self, name: impl Into<String>, labels: Vec<String>) -> Result<Self> {
        self.set_labels(name, labels)?;
        Ok(self)
    }

    /// Builder form of [`Frame::set_values`].
    pub fn with_values(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        self.set_values(name, values)?;
        Ok(self)
    }

    /// Insert or replace a label column.
    pub fn set_labels(&mut self, name: impl Into<String>, labels: Vec<String>) -> Result<()> {
        let name = name.into();
        self.check_len(&name, labels.len())?;
        self.labels.insert(name, labels);
        Ok(())
    }

    /// Insert or replace a numeric column.
    pub fn set_values(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        self.check_len(&name, values.len())?;
        self.values.insert(name, values);
        Ok(())
    }

    /// Remove a numeric column, returning it if present.
    pub fn remove_values(&mut self, name: &str) -> Option<Vec<Option<f64>>> {
        self.values.remove(name)
    }

    fn check_len(&self, name: &str, len: usize) -> Result<()> {
        if len == self.len() {
            Ok(())
        } else {
            Err(ReportError::data(format!(
                "column '{name}' has {len} rows, frame has {}",
                self.len()
            )))
        }
    }

    /// Label column by name.
    pub fn labels(&self, name: &str) -> Result<&[String]> {
        self.labels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ReportError::data(format!("unknown label column '{name}'")))
    }

    /// Numeric column by name.
    pub fn values(&self, name: &str) -> Result<&[Option<f64>]> {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ReportError::data(format!("unknown numeric column '{name}'")))
    }

    /// Whether a numeric column exists.
    pub fn has_values(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether a label column exists.
    pub fn has_labels(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// Names of the numeric columns, sorted.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Names of the label columns, sorted.
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Values of `name` at the given rows.
    pub fn gather(&self, name: &str, rows: &[usize]) -> Result<Vec<Option<f64>>> {
        let column = self.values(name)?;
        Ok(rows.iter().map(|&row| column[row]).collect())
    }

    /// Dates at the given rows.
    pub fn gather_time(&self, rows: &[usize]) -> Vec<NaiveDate> {
        rows.iter().map(|&row| self.time[row]).collect()
    }

    /// New frame holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            time: self.gather_time(rows),
            labels: self
                .labels
                .iter()
                .map(|(name, column)| {
                    (name.clone(), rows.iter().map(|&row| column[row].clone()).collect())
                })
                .collect(),
            values: self
                .values
                .iter()
                .map(|(name, column)| (name.clone(), rows.iter().map(|&row| column[row]).collect()))
                .collect(),
        }
    }

    /// New frame holding the rows for which `keep(row)` is true.
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&row| keep(row)).collect();
        self.select_rows(&rows)
    }

    /// New frame holding the rows whose label satisfies `keep`.
    pub fn filter_labels<F>(&self, name: &str, keep: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        let column = self.labels(name)?;
        Ok(self.filter(|row| keep(&column[row])))
    }

    /// New frame holding the rows whose value satisfies `keep`. Undefined
    /// values never match.
    pub fn filter_values<F>(&self, name: &str, keep: F) -> Result<Self>
    where
        F: Fn(f64) -> bool,
    {
        let column = self.values(name)?;
        Ok(self.filter(|row| column[row].is_some_and(&keep)))
    }

    /// New frame sorted by time. Rows on the same date keep their order.
    pub fn sort_by_time(&self) -> Self {
        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.sort_by_key(|&row| self.time[row]);
        self.select_rows(&rows)
    }

    /// Rows grouped by the label column `by`, groups in first-appearance
    /// order, rows inside a group sorted by time.
    pub fn groups(&self, by: &str) -> Result<Vec<Group>> {
        let column = self.labels(by)?;
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for (row, key) in column.iter().enumerate() {
            let slot = *index.entry(key.as_str()).or_insert_with(|| {
                groups.push(Group {
                    key: key.clone(),
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].rows.push(row);
        }

        for group in &mut groups {
            group.rows.sort_by_key(|&row| self.time[row]);
        }
        Ok(groups)
    }

    /// Distinct values of a label column in first-appearance order.
    pub fn unique_labels(&self, name: &str) -> Result<Vec<String>> {
        let column = self.labels(name)?;
        let mut seen = std::collections::HashSet::new();
        Ok(column
            .iter()
            .filter(|label| seen.insert(label.as_str()))
            .cloned()
            .collect())
    }

    /// Latest date in the frame.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.time.iter().max().copied()
    }

    /// One row per distinct date, sorted, with `columns` aggregated over the
    /// rows of that date. Undefined values are skipped; a date with no defined
    /// value stays undefined. Label columns are dropped.
    pub fn aggregate_by_time(&self, columns: &[&str], how: Aggregation) -> Result<Self> {
        let mut dates: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (row, time) in self.time.iter().enumerate() {
            dates.entry(*time).or_default().push(row);
        }

        let mut result = Self::new(dates.keys().copied().collect());
        for &name in columns {
            let column = self.values(name)?;
            let aggregated = dates
                .values()
                .map(|rows| aggregate(rows.iter().filter_map(|&row| column[row]), how))
                .collect();
            result.set_values(name, aggregated)?;
        }
        Ok(result)
    }

    /// Add a numeric column looked up per row from `table` by the label in
    /// column `on`. Rows whose key is missing get an undefined value.
    pub fn join_values(
        &mut self,
        on: &str,
        table: &BTreeMap<String, f64>,
        name: impl Into<String>,
    ) -> Result<()> {
        let joined = self
            .labels(on)?
            .iter()
            .map(|key| table.get(key).copied())
            .collect();
        self.set_values(name, joined)
    }
}

fn aggregate(values: impl Iterator<Item = f64>, how: Aggregation) -> Option<f64> {
    let (count, total) = values.fold((0_u32, 0.0), |(n, sum), v| (n + 1, sum + v));
    if count == 0 {
        return None;
    }
    match how {
        Aggregation::Sum => Some(total),
        Aggregation::Mean => Some(total / f64::from(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_common::test_utils::mock_date;

    fn sample() -> Frame {
        Frame::new(vec![
            mock_date(2020, 2, 25),
            mock_date(2020, 2, 24),
            mock_date(2020, 2, 24),
            mock_date(2020, 2, 25),
        ])
        .with_labels(
            "region",
            ["A", "A", "B", "B"].iter().map(ToString::to_string).collect(),
        )
        .unwrap()
        .with_values("cases", vec![Some(3.0), Some(1.0), None, Some(5.0)])
        .unwrap()
    }

    #[test]
    fn test_unknown_column_is_a_data_error() {
        let frame = sample();
        let error = frame.values("deaths").unwrap_err();
        assert!(matches!(error, ReportError::Data { .. }));
        assert!(error.to_string().contains("deaths"));
        assert!(frame.labels("province").is_err());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut frame = sample();
        assert!(frame.set_values("short", vec![Some(1.0)]).is_err());
    }

    #[test]
    fn test_groups_sorted_by_time() {
        let groups = sample().groups("region").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "A");
        assert_eq!(groups[0].rows, vec![1, 0]);
        assert_eq!(groups[1].key, "B");
        assert_eq!(groups[1].rows, vec![2, 3]);
    }

    #[test]
    fn test_sum_skips_undefined() {
        let totals = sample().aggregate_by_time(&["cases"], Aggregation::Sum).unwrap();
        assert_eq!(totals.time(), &[mock_date(2020, 2, 24), mock_date(2020, 2, 25)]);
        assert_eq!(totals.values("cases").unwrap(), &[Some(1.0), Some(8.0)]);

        let means = sample().aggregate_by_time(&["cases"], Aggregation::Mean).unwrap();
        assert_eq!(means.values("cases").unwrap(), &[Some(1.0), Some(4.0)]);
    }

    #[test]
    fn test_all_undefined_stays_undefined() {
        let frame = Frame::new(vec![mock_date(2020, 2, 24)])
            .with_values("x", vec![None])
            .unwrap();
        let totals = frame.aggregate_by_time(&["x"], Aggregation::Sum).unwrap();
        assert_eq!(totals.values("x").unwrap(), &[None]);
    }

    #[test]
    fn test_filter_and_unique() {
        let frame = sample();
        let only_b = frame.filter_labels("region", |r| r == "B").unwrap();
        assert_eq!(only_b.len(), 2);

        let defined = frame.filter_values("cases", |v| v > 2.0).unwrap();
        assert_eq!(defined.len(), 2);

        assert_eq!(frame.unique_labels("region").unwrap(), vec!["A", "B"]);
        assert_eq!(frame.last_date(), Some(mock_date(2020, 2, 25)));
    }

    #[test]
    fn test_join_values() {
        let mut frame = sample();
        let mut table = BTreeMap::new();
        table.insert("A".to_string(), 10.0);

        frame.join_values("region", &table, "population").unwrap();
        assert_eq!(
            frame.values("population").unwrap(),
            &[Some(10.0), Some(10.0), None, None]
        );
    }
}
