use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `exports` subdirectory and an initial `config.json` with
/// default settings.
///
/// # Arguments
/// - `invoicer_home` - The directory that will be the root of the home directory, e.g.
///   `$HOME/invoicer`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(invoicer_home: &Path) -> Result<Out<()>> {
    let config = Config::create(invoicer_home)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the invoicer directory and config at '{}'",
        config.config_path().display()
    )
    .into())
}
