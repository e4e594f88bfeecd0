//! Configuration module for sqlshift.
//!
//! Handles the TOML profile file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, DialectSettings, ScaleRangeSettings, Settings, SettingsError,
    CONFIG_ENV_VAR, LOCAL_CONFIG_FILE,
};
