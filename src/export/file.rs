//! Implements `DocumentExporter` for files and stdout.

use crate::export::DocumentExporter;
use crate::render::RenderedInvoice;
use crate::utils;
use anyhow::Context;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Writes each document to an HTML file that a browser can open and print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExporter {
    target: Target,
    written: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// Always write to this exact file.
    File(PathBuf),
    /// Write `<invoice-number>.html` inside this directory, creating it if needed.
    Dir(PathBuf),
}

impl FileExporter {
    /// Write every document to `path`, replacing what was there.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
            written: Vec::new(),
        }
    }

    /// Write each document to `<dir>/<invoice-number>.html`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::Dir(dir.into()),
            written: Vec::new(),
        }
    }

    /// The paths written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    async fn path_for(&self, document: &RenderedInvoice) -> anyhow::Result<PathBuf> {
        match &self.target {
            Target::File(path) => Ok(path.clone()),
            Target::Dir(dir) => {
                utils::make_dir(dir).await?;
                Ok(dir.join(file_name(&document.invoice_number)))
            }
        }
    }
}

#[async_trait::async_trait]
impl DocumentExporter for FileExporter {
    async fn export(&mut self, document: &RenderedInvoice) -> anyhow::Result<()> {
        let path = self.path_for(document).await?;
        utils::write(&path, &document.html).await?;
        info!("Wrote {} to {}", document.title, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Builds a safe file name from an invoice number, which is free text.
fn file_name(invoice_number: &str) -> String {
    let stem: String = invoice_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "invoice.html".to_string()
    } else {
        format!("{stem}.html")
    }
}

/// Writes each document to stdout so it can be piped elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutExporter;

#[async_trait::async_trait]
impl DocumentExporter for StdoutExporter {
    async fn export(&mut self, document: &RenderedInvoice) -> anyhow::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(document.html.as_bytes())
            .await
            .context("Unable to write the document to stdout")?;
        stdout.flush().await.context("Unable to flush stdout")
    }
}
