pub mod app_config;
pub mod config;
pub mod rotation;
pub mod text;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use types::{Platform, ScrapedPost};
