use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub log: LogConfig,
}

/// Locations of the flat files backing the application
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub catalog_file: String,
    pub settings_file: String,
    pub bookings_file: String,
}

impl DataConfig {
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(&self.catalog_file)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(&self.settings_file)
    }

    pub fn bookings_path(&self) -> PathBuf {
        self.dir.join(&self.bookings_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("data.dir", "data")?
            .set_default("data.catalog_file", "catalog.json")?
            .set_default("data.settings_file", "settings.json")?
            .set_default("data.bookings_file", "bookings.jsonl")?
            .set_default("log.filter", "cinebook=info,cinebook_order=info,cinebook_store=info")?
            .add_source(config::File::with_name("config/default").required(false))
            // Environment specific overrides, e.g. config/test.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // CINEBOOK__DATA__DIR=/var/lib/cinebook sets `data.dir`
            .add_source(config::Environment::with_prefix("CINEBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
