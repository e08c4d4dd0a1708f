use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timestamped weather observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub visibility: f64,
    pub pressure: f64,
}

impl ClimateRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        visibility: f64,
        pressure: f64,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
            wind_speed,
            visibility,
            pressure,
        }
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::WindSpeed => self.wind_speed,
            Metric::Visibility => self.visibility,
            Metric::Pressure => self.pressure,
        }
    }

    /// True when every metric is a finite number
    pub fn is_finite(&self) -> bool {
        Metric::ALL.iter().all(|m| self.value(*m).is_finite())
    }
}

/// A record tagged with its zero-based position in the original input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequencedRecord {
    pub position: usize,
    pub record: ClimateRecord,
}

impl SequencedRecord {
    pub fn new(position: usize, record: ClimateRecord) -> Self {
        Self { position, record }
    }

    pub fn year(&self) -> i32 {
        self.record.year()
    }

    pub fn value(&self, metric: Metric) -> f64 {
        self.record.value(metric)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    WindSpeed,
    Visibility,
    Pressure,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::WindSpeed,
        Metric::Visibility,
        Metric::Pressure,
    ];

    /// Metrics whose minimum and maximum observations are tracked.
    /// Pressure is averaged only.
    pub const TRACKED: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::WindSpeed,
        Metric::Visibility,
    ];

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Metric::Pressure)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::WindSpeed => "Wind Speed",
            Metric::Visibility => "Visibility",
            Metric::Pressure => "Pressure",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "",
            Metric::WindSpeed => "km/h",
            Metric::Visibility => "km",
            Metric::Pressure => "millibars",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_metric_accessors() {
        let record = ClimateRecord::new(timestamp(2012), 9.5, 0.81, 14.2, 10.1, 1015.3);

        assert_eq!(record.year(), 2012);
        assert_eq!(record.value(Metric::Temperature), 9.5);
        assert_eq!(record.value(Metric::Humidity), 0.81);
        assert_eq!(record.value(Metric::WindSpeed), 14.2);
        assert_eq!(record.value(Metric::Visibility), 10.1);
        assert_eq!(record.value(Metric::Pressure), 1015.3);
        assert!(record.is_finite());
    }

    #[test]
    fn test_non_finite_record() {
        let record = ClimateRecord::new(timestamp(2012), f64::NAN, 0.5, 1.0, 1.0, 1000.0);
        assert!(!record.is_finite());
    }

    #[test]
    fn test_pressure_is_not_tracked() {
        assert!(!Metric::Pressure.is_tracked());
        assert!(Metric::TRACKED.iter().all(|m| m.is_tracked()));
        assert!(!Metric::TRACKED.contains(&Metric::Pressure));
    }
}
