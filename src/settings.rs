//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional configuration file
//! (any format the `config` crate understands, picked by extension), then
//! `CLIMATE_*` environment variables. The CLI applies its own flags last.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::readers::TimestampPolicy;
use crate::utils::constants::{DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR, ENV_PREFIX};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SummaryConfig {
    /// Lower inclusive year bound
    pub min_year: i32,

    /// Upper inclusive year bound
    pub max_year: i32,

    pub input_path: Option<PathBuf>,

    /// Maximum number of partition reductions running at once
    #[validate(range(min = 1, max = 4096))]
    pub worker_concurrency: usize,

    /// Give up waiting for partition reductions after this many seconds
    #[validate(range(min = 1))]
    pub deadline_secs: Option<u64>,

    pub timestamp_policy: TimestampPolicy,

    pub use_mmap: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            input_path: None,
            worker_concurrency: num_cpus::get(),
            deadline_secs: None,
            timestamp_policy: TimestampPolicy::default(),
            use_mmap: false,
        }
    }
}

impl SummaryConfig {
    /// Load configuration from an optional file plus the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: SummaryConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the cross-field year bound check
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.min_year > self.max_year {
            return Err(ProcessingError::Config(format!(
                "min_year ({}) must not exceed max_year ({})",
                self.min_year, self.max_year
            )));
        }

        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    pub fn require_input_path(&self) -> Result<&Path> {
        self.input_path.as_deref().ok_or_else(|| {
            ProcessingError::Config("no input path given (flag, file or CLIMATE_INPUT_PATH)".to_string())
        })
    }
}
