use serde::{Deserialize, Serialize};

pub const DEFAULT_BINS: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HistogramError {
    #[error("cannot bin values containing infinity or NaN")]
    NonFinite,
}

/// Right-closed interval `(lower, upper]` and the number of values in it
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram data for the front-end chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub column: String,
}

impl ChartDescriptor {
    pub fn from_buckets(column: impl Into<String>, buckets: &[Bucket]) -> Self {
        Self {
            labels: (0..buckets.len()).map(|i| format!("Category {}", i + 1)).collect(),
            values: buckets.iter().map(|b| b.count).collect(),
            column: column.into(),
        }
    }
}

/// `num` evenly spaced points from `start` to `stop` inclusive
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num < 2 {
        return vec![start];
    }
    let step = (stop - start) / (num - 1) as f64;
    let mut points: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
    points[num - 1] = stop;
    points
}

/// Bin edges spanning the data. The lowest edge is pushed down by 0.1% of
/// the range so the minimum falls inside the first right-closed bin; a
/// constant series is widened on both sides instead.
fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let mut edges = if min == max {
        let widen = |v: f64| if v != 0.0 { 0.001 * v.abs() } else { 0.001 };
        linspace(min - widen(min), max + widen(max), bins + 1)
    } else {
        let mut edges = linspace(min, max, bins + 1);
        edges[0] -= (max - min) * 0.001;
        edges
    };
    edges.dedup();
    edges
}

/// Equal-width histogram of `values` with empty buckets left out.
///
/// Buckets come back in ascending order; their counts sum to `values.len()`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<Bucket>, HistogramError> {
    if values.is_empty() || bins == 0 {
        return Ok(Vec::new());
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(HistogramError::NonFinite);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let edges = bin_edges(min, max, bins);

    let mut counts = vec![0usize; edges.len().saturating_sub(1)];
    for value in values {
        let upper = edges.partition_point(|edge| edge < value);
        if upper == 0 || upper >= edges.len() {
            continue;
        }
        counts[upper - 1] += 1;
    }

    Ok(counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(idx, count)| Bucket {
            lower: edges[idx],
            upper: edges[idx + 1],
            count: *count,
        })
        .collect())
}
