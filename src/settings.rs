use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// HTML page holding the `.event-overview` root.
    pub page_path: String,
    /// Base URL that relative endpoint attributes resolve against.
    pub site_base_url: Url,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub display_timezone: String,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_POLL_INTERVAL_SECS=30, nesting uses a double underscore
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("page_path", "static/event_overview.html")?
            .set_default("site_base_url", "http://localhost:8000/")?
            .set_default("poll_interval_secs", 60)?
            .set_default("display_timezone", "UTC")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Message(
                "poll_interval_secs must be greater than zero".into(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display_timezone.parse::<Tz>().map_err(|err| {
            ConfigError::Message(format!(
                "invalid display_timezone {:?}: {err}",
                self.display_timezone
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
