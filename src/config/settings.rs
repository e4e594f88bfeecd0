//! TOML-based configuration for sqlshift.
//!
//! Supports a config file (sqlshift.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [dialect]
//! product = "${TARGET_DB}"
//! version = "5.7"
//! identifier_quote = "`"
//! unquoted_casing = "unchanged"
//! null_collation = "low"
//!
//! [dialect.max_precision]
//! VARCHAR = 65535
//!
//! [dialect.numeric_scale_range]
//! min = -12
//! max = 38
//!
//! [dialect.features]
//! nulls_ordering = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::sql::dialect::{
    Casing, DialectProfile, Feature, NullCollation, QuoteStyle, ScaleRange,
};
use crate::sql::node::TypeName;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SQLSHIFT_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sqlshift.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ConfigError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Target dialect profile.
    pub dialect: DialectSettings,
}

/// The `[dialect]` table: a product, its version, and overrides of the
/// canonical profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DialectSettings {
    /// Product name (`postgres`, `mssql`, `snowflake` ...).
    pub product: String,

    /// `MAJOR[.MINOR]`; absent means latest.
    pub version: Option<String>,

    /// `"`, `` ` ``, `[` or `none`.
    pub identifier_quote: Option<String>,

    /// `upper`, `lower` or `unchanged`.
    pub unquoted_casing: Option<String>,

    /// `high`, `low`, `first` or `last`.
    pub null_collation: Option<String>,

    /// Type name → largest precision.
    pub max_precision: BTreeMap<String, u32>,

    /// Bounds of the ROUND/TRUNCATE scale argument.
    pub numeric_scale_range: Option<ScaleRangeSettings>,

    /// Feature name → forced on/off.
    pub features: BTreeMap<String, bool>,
}

impl Default for DialectSettings {
    fn default() -> Self {
        Self {
            product: "ansi".to_string(),
            version: None,
            identifier_quote: None,
            unquoted_casing: None,
            null_collation: None,
            max_precision: BTreeMap::new(),
            numeric_scale_range: None,
            features: BTreeMap::new(),
        }
    }
}

/// `[dialect.numeric_scale_range]`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScaleRangeSettings {
    pub min: i64,
    pub max: i64,
}

impl DialectSettings {
    /// Build the profile these settings describe.
    ///
    /// String values go through environment expansion first.
    pub fn to_profile(&self) -> Result<DialectProfile, SettingsError> {
        let product = expand_env_vars(&self.product)?;
        let version = self.version.as_deref().map(expand_env_vars).transpose()?;
        let mut profile = DialectProfile::for_name(&product, version.as_deref())?;

        if let Some(quote) = &self.identifier_quote {
            profile = profile.with_identifier_quote(expand_env_vars(quote)?.parse::<QuoteStyle>()?);
        }
        if let Some(casing) = &self.unquoted_casing {
            profile = profile.with_unquoted_casing(expand_env_vars(casing)?.parse::<Casing>()?);
        }
        if let Some(collation) = &self.null_collation {
            profile = profile
                .with_null_collation(expand_env_vars(collation)?.parse::<NullCollation>()?);
        }
        for (name, max) in &self.max_precision {
            let ty = TypeName::from_str(name)
                .ok_or_else(|| ConfigError::UnknownType(name.clone()))?;
            profile = profile.with_max_precision(ty, *max);
        }
        if let Some(range) = self.numeric_scale_range {
            profile = profile.with_numeric_scale_range(ScaleRange::new(range.min, range.max)?);
        }
        for (name, enabled) in &self.features {
            profile = profile.with_feature(name.parse::<Feature>()?, *enabled);
        }

        debug!(
            target: "sqlshift::config",
            dialect = profile.name(),
            version = ?profile.version(),
            "profile built from settings"
        );
        Ok(profile)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        debug!(target: "sqlshift::config", path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLSHIFT_CONFIG`
    /// 2. `./sqlshift.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }

    /// Profile for the configured dialect.
    pub fn profile(&self) -> Result<DialectProfile, SettingsError> {
        self.dialect.to_profile()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric, non-underscore char
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
