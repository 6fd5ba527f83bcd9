//! Chart series preparation
//!
//! Turns a measurement list into the parallel label/value sequences a line
//! chart consumes. Labels use one fixed policy: a compact, zero-padded
//! "month/day hour:minute" rendering of the instant in the client's local
//! time.

use chrono::{DateTime, Local, Utc};

use crate::fhir::Measurement;

/// Parallel label/value sequences for a line chart
///
/// Built from measurements, so the two sequences always have equal length
/// and keep the input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Build the series from a measurement list
    pub fn from_measurements(measurements: &[Measurement]) -> Self {
        let mut labels = Vec::with_capacity(measurements.len());
        let mut values = Vec::with_capacity(measurements.len());

        for measurement in measurements {
            labels.push(format_label(measurement.taken_at));
            values.push(measurement.reps);
        }

        Self { labels, values }
    }

    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compact local-time label for a measurement instant: "%m/%d %H:%M"
pub fn format_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%m/%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_series_parallel_and_ordered() {
        let base = Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap();
        let measurements = vec![
            Measurement::new(10.0).taken_at(base),
            Measurement::new(12.0)
                .load_kg(20.0)
                .taken_at(base + chrono::Duration::hours(1)),
            Measurement::new(8.0).taken_at(base + chrono::Duration::hours(2)),
        ];

        let series = ChartSeries::from_measurements(&measurements);

        assert_eq!(series.len(), 3);
        assert_eq!(series.labels.len(), series.values.len());
        assert_eq!(series.values, vec![10.0, 12.0, 8.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = ChartSeries::from_measurements(&[]);
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }

    #[test]
    fn test_label_shape() {
        // Local offset varies by environment; assert the fixed shape instead
        // of an exact instant: "MM/DD HH:MM", zero-padded.
        let at = Utc.with_ymd_and_hms(2026, 4, 2, 9, 5, 0).unwrap();
        let label = format_label(at);

        assert_eq!(label.len(), 11);
        assert_eq!(&label[2..3], "/");
        assert_eq!(&label[5..6], " ");
        assert_eq!(&label[8..9], ":");
        assert!(label.chars().filter(|c| c.is_ascii_digit()).count() == 8);
    }
}
