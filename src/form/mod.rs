//! The invoice form: the editable state behind an invoice and the operations a user performs on
//! it.

mod draft;
mod event;

pub use draft::{Draft, DraftHeader, DraftItem, DraftValue};
pub use event::{FormEvent, HELP};

use crate::export::{DocumentExporter, ExportOutcome};
use crate::ids::IdSource;
use crate::model::{
    percent_to_fraction, HeaderField, InvoiceHeader, InvoiceNumber, LineItem, LineItemField,
    LineItems, Totals,
};
use crate::render::{self, InvoiceSnapshot, RenderOptions};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// The complete editable state of one invoice.
///
/// Totals are never stored here; `totals()` derives them from the current items and tax rate on
/// every call.
///
/// The invoice number starts out empty and is generated lazily by `ensure_invoice_number`. Once
/// it exists, only an explicit `regenerate_invoice_number` or `set_invoice_number` changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    invoice_number: Option<String>,
    header: InvoiceHeader,
    items: LineItems,
}

impl InvoiceForm {
    /// Creates an empty form with `header` and no line items.
    pub fn new(header: InvoiceHeader) -> Self {
        Self {
            invoice_number: None,
            header,
            items: LineItems::new(),
        }
    }

    /// Creates a form filled with demonstration data on top of `header`.
    pub fn sample(header: InvoiceHeader) -> Self {
        let mut form = Self::new(header);
        form.set_header_field(HeaderField::ClientName, "TechCorp Inc.");
        form.set_header_field(
            HeaderField::ClientAddress,
            "456 Innovation Drive, Silicon Valley, CA 94000",
        );
        form.set_header_field(HeaderField::ProjectName, "Web Application Development");
        form.set_header_field(HeaderField::ServicePeriod, "December 2024");
        for (description, quantity, unit_price) in [
            ("Software Development - Frontend", "40", "125"),
            ("Monthly SaaS Subscription", "1", "299"),
            ("Custom API Integration", "1", "1500"),
        ] {
            let id = form.add_item();
            form.update_item(id, LineItemField::Description, description);
            form.update_item(id, LineItemField::Quantity, quantity);
            form.update_item(id, LineItemField::UnitPrice, unit_price);
        }
        form
    }

    // Invoice number

    /// The invoice number, or `None` if it has not been generated yet.
    pub fn invoice_number(&self) -> Option<&str> {
        self.invoice_number
            .as_deref()
            .filter(|number| !number.is_empty())
    }

    /// True once the form has an invoice number and can be rendered.
    pub fn is_ready(&self) -> bool {
        self.invoice_number().is_some()
    }

    /// Generates the invoice number if there is none (or it was cleared). Does nothing
    /// otherwise, so calling it after every edit never changes an existing number.
    pub fn ensure_invoice_number(&mut self, ids: &mut dyn IdSource) -> &str {
        if !self.is_ready() {
            let number = InvoiceNumber::generate(ids);
            debug!("Generated invoice number {number}");
            self.invoice_number = Some(number.into());
        }
        self.invoice_number.as_deref().unwrap_or_default()
    }

    /// Replaces the invoice number with a freshly generated one that differs from the current
    /// number. Before the first number exists this does nothing and returns `None`.
    pub fn regenerate_invoice_number(&mut self, ids: &mut dyn IdSource) -> Option<&str> {
        let current = self.invoice_number()?.to_string();
        let number = InvoiceNumber::regenerate(&current, ids);
        info!("Invoice number changed from {current} to {number}");
        self.invoice_number = Some(number.into());
        self.invoice_number.as_deref()
    }

    /// Stores the invoice number exactly as typed.
    pub fn set_invoice_number(&mut self, raw: &str) {
        self.invoice_number = Some(raw.to_string());
    }

    // Header

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    /// Sets a header field from raw user input. See `InvoiceHeader::apply`.
    pub fn set_header_field(&mut self, field: HeaderField, raw: &str) {
        self.header.apply(field, raw);
    }

    pub fn tax_rate(&self) -> Decimal {
        self.header.tax_rate
    }

    /// Sets the tax rate as a fraction, e.g. `0.08`.
    pub fn set_tax_rate(&mut self, tax_rate: Decimal) {
        self.header.tax_rate = tax_rate;
    }

    /// Sets the tax rate from a typed percentage, e.g. `"8"`. Malformed input sets it to 0.
    pub fn set_tax_rate_percent(&mut self, raw: &str) {
        self.header.tax_rate = percent_to_fraction(raw);
    }

    // Line items

    pub fn items(&self) -> &[LineItem] {
        self.items.as_slice()
    }

    pub fn item(&self, id: u64) -> Option<&LineItem> {
        self.items.get(id)
    }

    /// Appends an item with an empty description, quantity 1 and unit price 0. Returns its id.
    pub fn add_item(&mut self) -> u64 {
        self.items.add()
    }

    /// Removes the item with `id`. Returns false, changing nothing, if there is no such item.
    pub fn remove_item(&mut self, id: u64) -> bool {
        self.items.remove(id)
    }

    /// Edits one field of the item with `id`. Numeric fields coerce malformed input to 0.
    /// Returns false, changing nothing, if there is no such item.
    pub fn update_item(&mut self, id: u64, field: LineItemField, raw: &str) -> bool {
        self.items.update(id, field, raw)
    }

    // Derived state

    /// Recomputes the totals from the current items and tax rate.
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.items, self.header.tax_rate)
    }

    /// A consistent view for rendering, or `None` while the form has no invoice number.
    pub fn snapshot(&self) -> Option<InvoiceSnapshot<'_>> {
        Some(InvoiceSnapshot {
            invoice_number: self.invoice_number()?,
            header: &self.header,
            items: self.items.as_slice(),
            totals: self.totals(),
        })
    }

    /// Renders the form and hands the document to `exporter`.
    ///
    /// This never fails. If the form has no invoice number yet nothing is rendered. If the
    /// exporter's target is unavailable the failure is logged and the form is left as it was.
    pub async fn export(
        &self,
        exporter: &mut dyn DocumentExporter,
        options: &RenderOptions,
    ) -> ExportOutcome {
        let Some(snapshot) = self.snapshot() else {
            warn!("The invoice has no number yet, nothing to export");
            return ExportOutcome::NotReady;
        };
        let document = match render::render(&snapshot, options) {
            Ok(document) => document,
            Err(e) => {
                warn!("{e:#}");
                return ExportOutcome::Aborted;
            }
        };
        match exporter.export(&document).await {
            Ok(()) => ExportOutcome::Exported,
            Err(e) => {
                warn!("Unable to export {}: {e:#}", document.title);
                ExportOutcome::Aborted
            }
        }
    }
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new(InvoiceHeader::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemoryExporter;
    use crate::ids::{RandomIds, SequentialIds};
    use crate::model::Amount;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn form() -> InvoiceForm {
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        InvoiceForm::new(InvoiceHeader::dated(today, 7))
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_number_is_lazy_and_stable() {
        let mut ids = SequentialIds::new(0x100);
        let mut form = form();
        assert_eq!(form.invoice_number(), None);
        assert!(!form.is_ready());

        assert_eq!(form.ensure_invoice_number(&mut ids), "INV-00000100");
        assert_eq!(form.ensure_invoice_number(&mut ids), "INV-00000100");

        let id = form.add_item();
        form.update_item(id, LineItemField::Quantity, "3");
        form.set_header_field(HeaderField::ClientName, "Acme");
        form.set_tax_rate_percent("5");
        form.ensure_invoice_number(&mut ids);
        assert_eq!(form.invoice_number(), Some("INV-00000100"));
    }

    #[test]
    fn test_regenerate_before_ready_is_noop() {
        let mut ids = SequentialIds::new(1);
        let mut form = form();
        assert_eq!(form.regenerate_invoice_number(&mut ids), None);
        assert_eq!(form.invoice_number(), None);
    }

    #[test]
    fn test_regenerate_twice_gives_distinct_numbers() {
        let mut ids = RandomIds;
        let mut form = form();
        let first = form.ensure_invoice_number(&mut ids).to_string();
        let second = form
            .regenerate_invoice_number(&mut ids)
            .unwrap()
            .to_string();
        let third = form
            .regenerate_invoice_number(&mut ids)
            .unwrap()
            .to_string();
        for number in [&second, &third] {
            assert!(InvoiceNumber::from_str(number).is_ok());
        }
        assert_ne!(first, second);
        assert_ne!(second, third);
    }

    #[test]
    fn test_clearing_number_regenerates_on_next_ensure() {
        let mut ids = SequentialIds::new(7);
        let mut form = form();
        form.ensure_invoice_number(&mut ids);
        form.set_invoice_number("");
        assert!(!form.is_ready());
        assert_eq!(form.ensure_invoice_number(&mut ids), "INV-00000008");
    }

    #[test]
    fn test_free_text_number_is_kept() {
        let mut ids = SequentialIds::new(7);
        let mut form = form();
        form.set_invoice_number("2024/017");
        assert_eq!(form.ensure_invoice_number(&mut ids), "2024/017");
    }

    #[test]
    fn test_totals_follow_edits() {
        let mut form = form();
        form.set_tax_rate(dec("0.1"));
        let a = form.add_item();
        form.update_item(a, LineItemField::Quantity, "2");
        form.update_item(a, LineItemField::UnitPrice, "10");
        let b = form.add_item();
        form.update_item(b, LineItemField::UnitPrice, "5");
        let totals = form.totals();
        assert_eq!(totals.subtotal().to_string(), "$25.00");
        assert_eq!(totals.tax_amount().to_string(), "$2.50");
        assert_eq!(totals.total().to_string(), "$27.50");

        form.remove_item(a);
        assert_eq!(form.totals().total(), Amount::new(dec("5.5")));

        form.set_tax_rate_percent("");
        assert_eq!(form.totals().total(), Amount::new(dec("5")));
    }

    #[test]
    fn test_add_then_remove_restores_items() {
        let mut form = InvoiceForm::sample(InvoiceHeader::default());
        let before = form.items().to_vec();
        let id = form.add_item();
        assert_eq!(form.items().len(), before.len() + 1);
        assert!(form.remove_item(id));
        assert_eq!(form.items(), before.as_slice());
    }

    #[test]
    fn test_unknown_ids_change_nothing() {
        let mut form = InvoiceForm::sample(InvoiceHeader::default());
        let before = form.clone();
        assert!(!form.update_item(99, LineItemField::Description, "x"));
        assert!(!form.remove_item(99));
        assert_eq!(form, before);
    }

    #[test]
    fn test_sample() {
        let form = InvoiceForm::sample(InvoiceHeader::default());
        assert_eq!(form.header().client_name, "TechCorp Inc.");
        let ids: Vec<u64> = form.items().iter().map(LineItem::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(form.totals().subtotal().to_string(), "$6799.00");
    }

    #[test]
    fn test_snapshot_requires_number() {
        let mut form = form();
        assert!(form.snapshot().is_none());
        form.ensure_invoice_number(&mut SequentialIds::new(1));
        let snapshot = form.snapshot().unwrap();
        assert_eq!(snapshot.invoice_number, "INV-00000001");
        assert_eq!(snapshot.totals, form.totals());
    }

    #[tokio::test]
    async fn test_export_not_ready() {
        let form = form();
        let mut exporter = MemoryExporter::new();
        let outcome = form.export(&mut exporter, &RenderOptions::default()).await;
        assert_eq!(outcome, ExportOutcome::NotReady);
        assert!(exporter.documents().is_empty());
    }

    #[tokio::test]
    async fn test_export_delivers_document() {
        let mut form = InvoiceForm::sample(InvoiceHeader::default());
        form.ensure_invoice_number(&mut SequentialIds::new(0xc0ffee));
        let mut exporter = MemoryExporter::new();
        let outcome = form.export(&mut exporter, &RenderOptions::default()).await;
        assert_eq!(outcome, ExportOutcome::Exported);
        let document = exporter.last().unwrap();
        assert_eq!(document.title, "Invoice INV-00C0FFEE");
        assert!(document.html.contains("Custom API Integration"));
        assert!(document.html.contains("$7342.92"));
    }

    #[tokio::test]
    async fn test_export_blocked_aborts_quietly() {
        let mut form = InvoiceForm::sample(InvoiceHeader::default());
        form.ensure_invoice_number(&mut SequentialIds::new(1));
        let before = form.clone();
        let mut exporter = MemoryExporter::blocked();
        let outcome = form.export(&mut exporter, &RenderOptions::default()).await;
        assert_eq!(outcome, ExportOutcome::Aborted);
        assert_eq!(form, before);

        // The form is immediately usable again.
        let mut working = MemoryExporter::new();
        let outcome = form.export(&mut working, &RenderOptions::default()).await;
        assert_eq!(outcome, ExportOutcome::Exported);
    }
}
