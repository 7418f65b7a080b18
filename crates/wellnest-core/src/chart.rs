//! Chart data and a plain-text line renderer.

use serde::{Deserialize, Serialize};

/// One labelled value of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Turns an ordered series into something displayable.
pub trait ChartRenderer {
    fn render(&self, title: &str, points: &[ChartPoint]) -> String;
}

/// Renders a series as one row of block characters scaled between the
/// series minimum and maximum, followed by the labels and a legend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparklineRenderer;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

impl SparklineRenderer {
    fn bar(value: f64, min: f64, max: f64) -> char {
        if !value.is_finite() || max <= min {
            return BARS[BARS.len() / 2];
        }
        let scaled = (value - min) / (max - min) * (BARS.len() - 1) as f64;
        BARS[(scaled.round() as usize).min(BARS.len() - 1)]
    }
}

impl ChartRenderer for SparklineRenderer {
    fn render(&self, title: &str, points: &[ChartPoint]) -> String {
        if points.is_empty() {
            return format!("{title}: no data");
        }
        let (min, max) = points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let line: String = points.iter().map(|p| Self::bar(p.value, min, max)).collect();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        format!(
            "{title}\n{line}\n{}\nmin {min:.1}  max {max:.1}",
            labels.join(" ")
        )
    }
}
