//! Plain-text summary of a report for terminal output.

use crate::parser::schema::{AnalysisReport, HistogramBucket};

/// Widest histogram bar, in characters
const MAX_BAR_WIDTH: usize = 50;

/// Render the slowest loops and the duration histogram
///
/// **Public** - used by the analyze command's `--summary` flag
pub fn render_summary(report: &AnalysisReport, max_lines: usize) -> String {
    let mut lines = Vec::new();
    let total = report.statistics.total_duration_ns.max(1.0);

    lines.push("  SLOWEST LOOP ITERATIONS".to_string());
    lines.push("  ┏━━━━━━━━━━━━━━┳━━━━━━━━━━┳━━━━━━━━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:^12} ┃ {:^8} ┃ {:^14} ┃ {:^7} ┃ {:<30} ┃",
        "START", "SAMPLES", "DURATION (ns)", "%", "Hottest Frame"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━━━━━━━━━━━╋━━━━━━━━━╋━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┫".to_string());

    for entry in report.ranked_loops.iter().take(max_lines) {
        let percentage = entry.total_duration_ns / total * 100.0;
        let hottest = entry
            .frames
            .iter()
            .max_by(|a, b| a.duration_ns.total_cmp(&b.duration_ns))
            .map(|frame| truncate(&frame.name, 30))
            .unwrap_or_default();

        lines.push(format!(
            "  ┃ {:>12} ┃ {:>8} ┃ {:>14.0} ┃ {:>6.1}% ┃ {:<30} ┃",
            entry.start_sample_index, entry.sample_count, entry.total_duration_ns, percentage, hottest
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━┻━━━━━━━━━━┻━━━━━━━━━━━━━━━━┻━━━━━━━━━┻━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".to_string());

    if report.ranked_loops.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} ranked loops)",
            max_lines,
            report.ranked_loops.len()
        ));
    }

    lines.push(String::new());
    lines.push("  LOOP DURATION HISTOGRAM".to_string());
    lines.extend(render_histogram(&report.histogram));

    lines.join("\n")
}

fn render_histogram(buckets: &[HistogramBucket]) -> Vec<String> {
    let peak = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    buckets
        .iter()
        .map(|bucket| {
            let width = (bucket.count as f64 / peak as f64 * MAX_BAR_WIDTH as f64).round() as usize;
            format!(
                "  [{:>12.0}, {:>12.0}) {:<50} {}",
                bucket.range_start,
                bucket.range_end,
                "█".repeat(width),
                bucket.count
            )
        })
        .collect()
}

/// Keep the tail of long names, which carries the function name
fn truncate(name: &str, max: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() > max {
        let tail: String = chars[chars.len() - max.saturating_sub(3)..].iter().collect();
        format!("...{}", tail)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("crate::module::very_long_function", 12), "..._function");
    }

    #[test]
    fn test_truncate_narrower_than_ellipsis() {
        assert_eq!(truncate("update", 2), "...");
        assert_eq!(truncate("update", 0), "...");
    }

    #[test]
    fn test_histogram_bars_scale_to_peak() {
        let buckets = vec![
            HistogramBucket {
                range_start: 0.0,
                range_end: 10.0,
                count: 4,
            },
            HistogramBucket {
                range_start: 10.0,
                range_end: 20.0,
                count: 2,
            },
        ];

        let rendered = render_histogram(&buckets);

        assert_eq!(rendered[0].matches('█').count(), MAX_BAR_WIDTH);
        assert_eq!(rendered[1].matches('█').count(), MAX_BAR_WIDTH / 2);
    }
}
