//! Pure transforms on time-ordered series.
//!
//! Every function here takes slices that are already sorted by time and
//! returns a new vector of the same length. Undefined values are `None` and
//! propagate instead of raising errors.

use chrono::NaiveDate;
use std::ops::{Add, Sub};

/// Default cumulative case count that marks the start of an epidemic.
pub const DEFAULT_EPIDEMIC_THRESHOLD: f64 = 100.0;

/// Decimals kept by the KPI ratios.
pub const KPI_DECIMALS: u32 = 2;

/// First-difference a cumulative series.
///
/// Element 0 is `first`; element `i > 0` is `values[i] - values[i - 1]`.
pub fn decumulate<T>(values: &[T], first: T) -> Vec<T>
where
    T: Copy + Sub<Output = T>,
{
    if values.is_empty() {
        return Vec::new();
    }
    let mut deltas = Vec::with_capacity(values.len());
    deltas.push(first);
    deltas.extend(values.windows(2).map(|pair| pair[1] - pair[0]));
    deltas
}

/// Running sum; the inverse of [`decumulate`] when `first` is `values[0]`.
pub fn cumulate<T>(deltas: &[T]) -> Vec<T>
where
    T: Copy + Add<Output = T>,
{
    let mut totals: Vec<T> = Vec::with_capacity(deltas.len());
    for &delta in deltas {
        let next = match totals.last() {
            Some(&total) => total + delta,
            None => delta,
        };
        totals.push(next);
    }
    totals
}

/// [`decumulate`] over optional values. An undefined operand gives an
/// undefined delta.
pub fn decumulate_optional(values: &[Option<f64>], first: Option<f64>) -> Vec<Option<f64>> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut deltas = Vec::with_capacity(values.len());
    deltas.push(first);
    deltas.extend(values.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(previous), Some(current)) => Some(current - previous),
        _ => None,
    }));
    deltas
}

/// Earliest date whose value is at or above `threshold`.
pub fn epidemic_start(
    times: &[NaiveDate],
    values: &[Option<f64>],
    threshold: f64,
) -> Option<NaiveDate> {
    times
        .iter()
        .zip(values)
        .filter(|(_, value)| value.is_some_and(|v| v >= threshold))
        .map(|(time, _)| *time)
        .min()
}

/// Whole days elapsed since `start`, negative before it. Every age is
/// undefined when there is no start.
pub fn epidemic_ages(times: &[NaiveDate], start: Option<NaiveDate>) -> Vec<Option<i64>> {
    times
        .iter()
        .map(|time| start.map(|s| (*time - s).num_days()))
        .collect()
}

/// Why a group could not be anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSkipReason {
    /// No row falls on the anchor date.
    MissingAnchorRow,
    /// The value on the anchor date is zero.
    ZeroAnchor,
    /// The value on the anchor date is undefined.
    UndefinedAnchor,
}

impl std::fmt::Display for AnchorSkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingAnchorRow => "no row on the anchor date",
            Self::ZeroAnchor => "zero value on the anchor date",
            Self::UndefinedAnchor => "undefined value on the anchor date",
        };
        f.write_str(text)
    }
}

/// Value on the first row dated `anchor`.
pub fn anchor_value(
    times: &[NaiveDate],
    values: &[Option<f64>],
    anchor: NaiveDate,
) -> Result<f64, AnchorSkipReason> {
    let position = times
        .iter()
        .position(|time| *time == anchor)
        .ok_or(AnchorSkipReason::MissingAnchorRow)?;

    match values.get(position).copied().flatten() {
        Some(value) if !value.is_finite() => Err(AnchorSkipReason::UndefinedAnchor),
        Some(value) if value == 0.0 => Err(AnchorSkipReason::ZeroAnchor),
        Some(value) => Ok(value),
        None => Err(AnchorSkipReason::UndefinedAnchor),
    }
}

/// Each value divided by the value on the anchor date.
pub fn anchored(
    times: &[NaiveDate],
    values: &[Option<f64>],
    anchor: NaiveDate,
) -> Result<Vec<Option<f64>>, AnchorSkipReason> {
    let base = anchor_value(times, values, anchor)?;
    Ok(values.iter().map(|value| value.map(|v| v / base)).collect())
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// `round(num / den * multiplier, decimals)`, undefined when either operand
/// is undefined, the denominator is zero, or the result is not finite.
pub fn ratio(num: Option<f64>, den: Option<f64>, multiplier: f64, decimals: u32) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    let value = num / den * multiplier;
    value.is_finite().then(|| round_to(value, decimals))
}

/// KPI ratio rounded to two decimals.
pub fn kpi_ratio(num: Option<f64>, den: Option<f64>, multiplier: f64) -> Option<f64> {
    ratio(num, den, multiplier, KPI_DECIMALS)
}

/// Shift a series `lag` rows later, padding the head with `fill`.
pub fn lag(values: &[Option<f64>], lag: usize, fill: Option<f64>) -> Vec<Option<f64>> {
    let pad = lag.min(values.len());
    let mut shifted = vec![fill; pad];
    shifted.extend_from_slice(&values[..values.len() - pad]);
    shifted
}
