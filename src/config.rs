use std::net::SocketAddr;
use std::path::Path;

use ::config::{Config, Environment, File, Source};
use serde::Deserialize;

use crate::db::repository::CollectionNames;
use crate::error::AppError;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "catalog";

/// Runtime settings for the catalog service.
///
/// Layered lowest to highest precedence: built-in defaults, an optional config
/// file, then the process environment (`MONGODB_URI`, `MONGODB_DATABASE`,
/// `BRANDS_COLLECTION`, `ITEMS_COLLECTION`, `HOST`, `PORT`).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Connection string for the document store. Required.
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub collections: CollectionNames,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    mongodb_uri: Option<String>,
    mongodb_database: String,
    brands_collection: String,
    items_collection: String,
    host: String,
    port: u16,
}

impl Settings {
    /// Load settings from `config_file` (or the optional default file) and the
    /// environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with(config_file, Environment::default())
    }

    /// Same as [`Settings::load`] with an explicit environment layer.
    pub fn load_with(config_file: Option<&Path>, env: Environment) -> Result<Self, AppError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Self::from_config(layered(file, env)?)
    }

    /// Resolve settings from an already assembled configuration.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let raw: RawSettings = config.try_deserialize()?;

        let mongodb_uri = raw
            .mongodb_uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("MONGODB_URI environment variable is missing!".into())
            })?;

        Ok(Self {
            mongodb_uri,
            mongodb_database: raw.mongodb_database,
            collections: CollectionNames {
                brands: raw.brands_collection,
                items: raw.items_collection,
            },
            host: raw.host,
            port: raw.port,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid bind address: {e}")))
    }
}

/// Stack defaults, then `file`, then `env`; later layers win.
pub fn layered<S>(file: S, env: Environment) -> Result<Config, AppError>
where
    S: Source + Send + Sync + 'static,
{
    Ok(defaults()?.add_source(file).add_source(env).build()?)
}

/// Built-in defaults, the lowest configuration layer.
pub fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, AppError> {
    let collections = CollectionNames::default();
    Ok(Config::builder()
        .set_default("mongodb_database", "catalog")?
        .set_default("brands_collection", collections.brands)?
        .set_default("items_collection", collections.items)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 5000)?)
}
