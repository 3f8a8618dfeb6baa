//! Delivery of rendered invoices.
//!
//! Opening the finished document is a side effect the form does not depend on. The
//! `DocumentExporter` trait hides where the document goes: a file, stdout, or memory in tests.

mod file;
mod memory;

pub use file::{FileExporter, StdoutExporter};
pub use memory::MemoryExporter;

use crate::render::RenderedInvoice;
use serde::Serialize;

/// Delivers a rendered invoice somewhere a person can view and print it.
#[async_trait::async_trait]
pub trait DocumentExporter: Send {
    /// Hands `document` to the target. An error means the target was unavailable.
    async fn export(&mut self, document: &RenderedInvoice) -> anyhow::Result<()>;
}

/// What happened when the form was asked to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    /// The document was delivered.
    Exported,
    /// The form has no invoice number yet, so nothing was rendered.
    NotReady,
    /// The target was unavailable. Nothing about the form changed.
    Aborted,
}

serde_plain::derive_display_from_serialize!(ExportOutcome);
