//! Configuration management for the fee ledger.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `FEE_LEDGER_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::documents::Institution;
use crate::types::LedgerError;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "student-fee-ledger";

/// Default ledger file name.
const DATA_FILE_NAME: &str = "students.csv";

/// Default credentials file name.
const CREDENTIALS_FILE_NAME: &str = "credentials.csv";

/// Environment variable prefix; nested keys are separated by `__`.
const ENV_PREFIX: &str = "FEE_LEDGER_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (e.g. `FEE_LEDGER_LEDGER__DATA_FILE`)
/// 2. TOML config file at `~/.config/student-fee-ledger/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub auth: AuthConfig,
    pub institution: Institution,
    pub payment: PaymentConfig,
}

/// File locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path to the ledger CSV.
    /// Defaults to `~/.local/share/student-fee-ledger/students.csv`
    pub data_file: Option<PathBuf>,
    /// Path to the credentials CSV.
    /// Defaults to `credentials.csv` next to the ledger file
    pub credentials_file: Option<PathBuf>,
}

/// Login behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accept credential rows that store a plaintext password.
    pub allow_plaintext: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_plaintext: true,
        }
    }
}

/// Online payment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Receiving UPI id; empty disables payment links.
    pub upi_id: String,
    /// Payee name shown by the payer's app.
    pub payee_name: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            upi_id: String::new(),
            payee_name: "DR.G.U.Pope College".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self, LedgerError> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, LedgerError> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.institution.name.trim().is_empty() {
            return Err(LedgerError::config("institution.name must not be blank"));
        }

        Ok(())
    }

    /// Get the ledger file path, resolving defaults if not set.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.ledger
            .data_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATA_FILE_NAME))
    }

    /// Get the credentials file path, resolving defaults if not set.
    #[must_use]
    pub fn credentials_file(&self) -> PathBuf {
        self.ledger.credentials_file.clone().unwrap_or_else(|| {
            self.data_file()
                .parent()
                .map(|dir| dir.join(CREDENTIALS_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE_NAME))
        })
    }
}
