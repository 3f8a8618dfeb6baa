//! Configuration file handling for invoicer.
//!
//! The configuration file is stored at `$INVOICER_HOME/config.json`. It holds the defaults that
//! every new invoice starts from (tax rate, due date offset, payment terms) and the settings of
//! the rendered document (logo, footer, auto print).

use crate::error::Res;
use crate::model::{InvoiceHeader, DEFAULT_DUE_IN_DAYS, DEFAULT_PAYMENT_TERMS, DEFAULT_TAX_RATE};
use crate::render::{RenderOptions, DEFAULT_FOOTER, DEFAULT_LOGO_PATH};
use crate::utils;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "invoicer";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const EXPORTS: &str = "exports";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$INVOICER_HOME` and from there it loads `$INVOICER_HOME/config.json`. It also
/// provides the paths of items that are expected in a certain location within the home
/// directory.
#[derive(Debug, Clone)]
pub struct Config {
    exports: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, the `exports` directory and an initial `config.json` with
    /// default settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the invoicer home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let exports = root.join(EXPORTS);
        utils::make_dir(&exports).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            exports,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `invoicer_home` and its config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(invoicer_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = invoicer_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Invoicer Home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            exports: root.join(EXPORTS),
            config_path,
            config_file,
        })
    }

    /// Loads the config if `invoicer_home` has one, otherwise uses the default settings. A
    /// config file that exists but is invalid is still an error.
    pub async fn load_or_default(invoicer_home: impl Into<PathBuf>) -> Res<Self> {
        let root = invoicer_home.into();
        if root.join(CONFIG_JSON).is_file() {
            return Self::load(root).await;
        }
        debug!(
            "No config file in '{}', using the default settings",
            root.display()
        );
        Ok(Self {
            exports: root.join(EXPORTS),
            config_path: root.join(CONFIG_JSON),
            config_file: ConfigFile::default(),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory where exported invoices are written by default.
    pub fn exports(&self) -> &Path {
        &self.exports
    }

    /// The default tax rate as a fraction.
    pub fn tax_rate(&self) -> Decimal {
        self.config_file.tax_rate
    }

    pub fn due_in_days(&self) -> u32 {
        self.config_file.due_in_days
    }

    pub fn payment_terms(&self) -> &str {
        &self.config_file.payment_terms
    }

    /// The header a new invoice starts from when it is created on `today`.
    pub fn base_header(&self, today: NaiveDate) -> InvoiceHeader {
        let mut header = InvoiceHeader::dated(today, self.config_file.due_in_days);
        header.tax_rate = self.config_file.tax_rate;
        header.payment_terms = self.config_file.payment_terms.clone();
        header
    }

    /// The document settings for rendering.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            logo_path: self.config_file.logo_path.clone(),
            footer: self.config_file.footer.clone(),
            auto_print: self.config_file.auto_print,
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "invoicer",
///   "config_version": 1,
///   "logo_path": "/assets/logo.svg",
///   "tax_rate": "0.08",
///   "due_in_days": 7,
///   "payment_terms": "Net 30",
///   "footer": "Thank you for your business!",
///   "auto_print": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "invoicer"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path or URL of the logo shown in the header and as the watermark
    #[serde(default = "default_logo_path")]
    logo_path: String,

    /// Default tax rate as a fraction
    #[serde(default = "default_tax_rate")]
    tax_rate: Decimal,

    /// Days between the invoice date and the due date of a new invoice
    #[serde(default = "default_due_in_days")]
    due_in_days: u32,

    #[serde(default = "default_payment_terms")]
    payment_terms: String,

    /// The closing line under the totals
    #[serde(default = "default_footer")]
    footer: String,

    /// Whether exported documents open the print dialog when loaded
    #[serde(default = "default_auto_print")]
    auto_print: bool,
}

fn default_logo_path() -> String {
    DEFAULT_LOGO_PATH.to_string()
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

fn default_due_in_days() -> u32 {
    DEFAULT_DUE_IN_DAYS
}

fn default_payment_terms() -> String {
    DEFAULT_PAYMENT_TERMS.to_string()
}

fn default_footer() -> String {
    DEFAULT_FOOTER.to_string()
}

fn default_auto_print() -> bool {
    true
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            logo_path: default_logo_path(),
            tax_rate: default_tax_rate(),
            due_in_days: default_due_in_days(),
            payment_terms: default_payment_terms(),
            footer: default_footer(),
            auto_print: default_auto_print(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from `path` and validates its `app_name`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to `path`.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
