//! Implements `DocumentExporter` by keeping documents in memory.

use crate::export::DocumentExporter;
use crate::render::RenderedInvoice;
use anyhow::bail;

/// Collects exported documents in memory. A blocked exporter refuses every document, the way a
/// browser with popups blocked refuses to open a new window.
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    documents: Vec<RenderedInvoice>,
    blocked: bool,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter whose target is never available.
    pub fn blocked() -> Self {
        Self {
            documents: Vec::new(),
            blocked: true,
        }
    }

    /// Every document exported so far, oldest first.
    pub fn documents(&self) -> &[RenderedInvoice] {
        &self.documents
    }

    pub fn last(&self) -> Option<&RenderedInvoice> {
        self.documents.last()
    }
}

#[async_trait::async_trait]
impl DocumentExporter for MemoryExporter {
    async fn export(&mut self, document: &RenderedInvoice) -> anyhow::Result<()> {
        if self.blocked {
            bail!("The export target is blocked");
        }
        self.documents.push(document.clone());
        Ok(())
    }
}
