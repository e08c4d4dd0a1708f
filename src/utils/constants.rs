/// Source column names
pub const COLUMN_TIMESTAMP: &str = "Formatted Date";
pub const COLUMN_TEMPERATURE: &str = "Temperature (C)";
pub const COLUMN_HUMIDITY: &str = "Humidity";
pub const COLUMN_WIND_SPEED: &str = "Wind Speed (km/h)";
pub const COLUMN_VISIBILITY: &str = "Visibility (km)";
pub const COLUMN_PRESSURE: &str = "Pressure (millibars)";

/// Timestamp formats carrying a UTC offset, tried first and in order
pub const OFFSET_TIMESTAMP_FORMATS: [&str; 2] =
    ["%Y-%m-%d %H:%M:%S%.3f %z", "%Y-%m-%d %H:%M:%S %z"];

/// Timestamp formats without an offset, tried after the offset-aware ones
pub const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Year range
pub const DEFAULT_MIN_YEAR: i32 = 2006;
pub const DEFAULT_MAX_YEAR: i32 = 2016;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CLIMATE";
