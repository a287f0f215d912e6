use eyre::Result;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    prelude::*,
    Registry,
};

pub use self::fmt::Style;

/// Configure a `tracing_subscriber::fmt` Layer outputting to stdout
mod fmt;

/// Logging level. A "higher level" means more will be logged.
#[derive(Default, Debug, Clone, Copy, serde::Deserialize, PartialOrd, Ord, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    /// Off
    Off = 0,
    /// Error
    Error = 1,
    /// Warn
    Warn = 2,
    /// Debug
    Debug = 4,
    /// Trace
    Trace = 5,
    /// Info
    #[serde(other)]
    #[default]
    Info = 3,
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> LevelFilter {
        match level {
            Level::Off => LevelFilter::OFF,
            Level::Error => LevelFilter::ERROR,
            Level::Warn => LevelFilter::WARN,
            Level::Info => LevelFilter::INFO,
            Level::Debug => LevelFilter::DEBUG,
            Level::Trace => LevelFilter::TRACE,
        }
    }
}

/// Configuration for the tracing subscribers used while purging
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TracingConfig {
    /// Output format
    #[serde(default)]
    pub fmt: Style,
    /// Most verbose level that is logged
    #[serde(default)]
    pub level: Level,
}

impl TracingConfig {
    /// Per-target filter for the configured level.
    pub fn targets(&self) -> Targets {
        let mut target_layer = Targets::new().with_default(self.level);
        if self.level < Level::Trace {
            // only show sqlx query logs at trace level
            target_layer = target_layer.with_target("sqlx::query", Level::Warn);
            target_layer = target_layer.with_target("sea_orm::driver", Level::Info);
        }
        target_layer
    }

    /// Attempt to instantiate and register a tracing subscriber setup from
    /// settings.
    pub fn start_tracing(&self) -> Result<()> {
        let err_layer = tracing_error::ErrorLayer::default();

        let subscriber = Registry::default()
            .with(self.fmt.layer::<Registry>())
            .with(self.targets())
            .with(err_layer);

        subscriber.try_init()?;
        Ok(())
    }
}
