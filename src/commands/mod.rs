//! Command handlers for the invoicer CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod edit;
mod export;
mod init;
mod new;
mod totals;

use crate::error::{ErrorType, IntoResult, Res};
use crate::form::{Draft, InvoiceForm};
use crate::model::InvoiceHeader;
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub use edit::{edit, Flow, Session};
pub use export::{export, ExportReport};
pub use init::init;
pub use new::new_draft;
pub use totals::{totals, TotalsReport};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data describing the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the config in `invoicer_home`, or the default settings if there is none yet.
pub async fn load_config(invoicer_home: &Path) -> Result<Config> {
    Config::load_or_default(invoicer_home)
        .await
        .pub_result(ErrorType::Config)
}

/// Reads a draft file and builds a form on top of `base`.
async fn load_draft(path: &Path, base: InvoiceHeader) -> Res<InvoiceForm> {
    let draft: Draft = utils::deserialize(path)
        .await
        .with_context(|| format!("Unable to load the draft '{}'", path.display()))?;
    debug!(
        "Loaded draft '{}' with {} items",
        path.display(),
        draft.items.len()
    );
    Ok(draft.into_form(base))
}

/// Serializes `form` as a pretty-printed draft file.
fn draft_json(form: &InvoiceForm) -> Res<String> {
    serde_json::to_string_pretty(&form.to_draft()).context("Unable to serialize the draft")
}

/// Writes `text` and a trailing newline to stdout.
async fn write_stdout(text: &str) -> Res<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{text}\n").as_bytes())
        .await
        .context("Unable to write to stdout")?;
    stdout.flush().await.context("Unable to flush stdout")
}
