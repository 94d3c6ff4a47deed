use std::env;
use std::fs::File;
use std::io::{
    BufReader,
    Read
};
use std::path::{
    Path,
    PathBuf
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::{
    warn,
    LevelFilter
};
use serde::Deserialize;

use crate::configurationerror::ConfigurationError;
use crate::time::calendar::holidayfetcher::{
    HolidayFetcher,
    DEFAULT_FETCH_TIMEOUT,
    DEFAULT_HOLIDAY_URL
};
use crate::time::calendar::holidayregistry::{
    HolidayRegistry,
    DEFAULT_CACHE_FILE
};
use crate::time::calendar::registryerror::RegistryError;
use crate::time::instant::resolve_timezone;

pub const LOG_LEVEL_ENV: &str = "TIMEWORKDAY_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HolidaySettings {
    pub url: String,
    pub cache_file: PathBuf,
    pub daily_sync: bool,
    pub fetch_timeout_secs: u64
}

impl Default for HolidaySettings {
    fn default() -> Self {
        HolidaySettings {
            url: DEFAULT_HOLIDAY_URL.to_owned(),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            daily_sync: true,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs()
        }
    }
}

impl HolidaySettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn fetcher(&self) -> Result<HolidayFetcher, RegistryError> {
        HolidayFetcher::new(&self.url, self.fetch_timeout())
    }

    /// Builds the shared registry. A fetcher that cannot be built leaves the
    /// registry offline rather than failing startup.
    pub fn build_registry(&self) -> Arc<HolidayRegistry> {
        let fetcher = match self.fetcher() {
            Ok(fetcher) => Some(fetcher),
            Err(e) => {
                warn!("holiday downloads disabled: {e}");
                None
            }
        };
        Arc::new(HolidayRegistry::new(self.cache_file.clone(), fetcher, self.daily_sync))
    }
}

/// Server settings, read from an optional JSON file. Every field has a
/// default so an empty object (or no file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub holidays: HolidaySettings,
    pub default_timezone: Option<String>,
    pub log_level: String
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            holidays: HolidaySettings::default(),
            default_timezone: None,
            log_level: "info".to_owned()
        }
    }
}

impl Configuration {
    pub fn from_reader(reader: impl Read) -> Result<Configuration, ConfigurationError> {
        let configuration: Configuration = serde_json::from_reader(reader)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let file = File::open(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source
        })?;
        Configuration::from_reader(BufReader::new(file))
    }

    /// `TIMEWORKDAY_LOG` replaces the configured log level.
    pub fn with_env_overrides(mut self) -> Result<Configuration, ConfigurationError> {
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.log_level_filter()?;
        if let Some(name) = &self.default_timezone {
            resolve_timezone(name).map_err(|_| ConfigurationError::UnknownTimezone(name.clone()))?;
        }
        if self.holidays.fetch_timeout_secs == 0 {
            return Err(ConfigurationError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigurationError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigurationError::UnknownLogLevel(self.log_level.clone()))
    }

    pub fn default_timezone(&self) -> Option<&str> {
        self.default_timezone.as_deref()
    }
}
