pub mod breathe;
pub mod config;
pub mod dashboard;
pub mod fitness;
pub mod journal;
mod live;
pub mod meals;
pub mod mood;
pub mod session;
pub mod sleep;
pub mod stats;
pub mod stretch;
pub mod water;
pub mod weight;

use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use wellnest_core::{ChartPoint, ChartRenderer, Config, SparklineRenderer};

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_chart(title: &str, points: &[ChartPoint]) {
    println!("{}", SparklineRenderer.render(title, points));
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("'{s}' is not a time like 23:30"))
}

/// `--tick-ms` when given, otherwise the configured period.
pub(crate) fn tick_period(config: &Config, tick_ms: Option<u64>) -> Duration {
    tick_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.tick_period())
}
