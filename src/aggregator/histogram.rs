//! Loop duration histogram.

use crate::parser::HistogramBucket;
use crate::utils::config::MAX_HISTOGRAM_BUCKETS;
use crate::utils::error::AnalysisError;
use log::debug;

/// Bucket durations into fixed-width bins starting at the minimum
///
/// **Public** - main entry point for distribution reporting
///
/// Produces `[min, min + W), [min + W, min + 2W), ...` up to the bucket that
/// holds `max`, followed by one terminal bucket lying entirely above `max`.
/// An empty input yields no buckets.
///
/// # Errors
/// * `AnalysisError::InvalidBinWidth` - width is zero, negative or not finite
/// * `AnalysisError::HistogramTooWide` - the range needs more than
///   `MAX_HISTOGRAM_BUCKETS` buckets
pub fn build_histogram(durations: &[f64], width: f64) -> Result<Vec<HistogramBucket>, AnalysisError> {
    if !(width.is_finite() && width > 0.0) {
        return Err(AnalysisError::InvalidBinWidth(width));
    }

    let Some((min, max)) = min_max(durations) else {
        return Ok(Vec::new());
    };

    // Every regular bucket plus the terminal one
    let buckets = ((max - min) / width).floor() + 2.0;
    if buckets.is_nan() || buckets > MAX_HISTOGRAM_BUCKETS as f64 {
        return Err(AnalysisError::HistogramTooWide {
            buckets,
            limit: MAX_HISTOGRAM_BUCKETS,
        });
    }

    let bucket_of = |value: f64| ((value - min) / width).floor() as usize;
    let mut counts = vec![0u64; buckets as usize];
    for &value in durations {
        counts[bucket_of(value)] += 1;
    }

    debug!(
        "Histogram: {} buckets over [{:.0}, {:.0}] ns",
        counts.len(),
        min,
        max
    );

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBucket {
            range_start: min + index as f64 * width,
            range_end: min + (index + 1) as f64 * width,
            count,
        })
        .collect())
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().fold((*first, *first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}
