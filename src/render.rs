//! Renders an invoice into a standalone, print-ready HTML document.

use crate::error::Res;
use crate::model::{Amount, InvoiceHeader, LineItem, Totals};
use anyhow::Context;
use askama::{Html, MarkupDisplay, Template};
use rust_decimal::{Decimal, RoundingStrategy};

/// The logo used for the header and the watermark when none is configured.
pub const DEFAULT_LOGO_PATH: &str = "/assets/logo.svg";

/// The closing line printed under the totals when none is configured.
pub const DEFAULT_FOOTER: &str = "Thank you for your business!";

/// Settings that affect the rendered document but not the invoice itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Path or URL of the logo image, used for the header and the faint background watermark.
    pub logo_path: String,
    /// The closing line under the totals.
    pub footer: String,
    /// Whether the document opens the viewer's print dialog once it has loaded.
    pub auto_print: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            logo_path: DEFAULT_LOGO_PATH.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            auto_print: true,
        }
    }
}

/// A consistent view of a form that is ready to be rendered.
///
/// Obtain one from `InvoiceForm::snapshot`, which only hands it out once the form has an
/// invoice number.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceSnapshot<'a> {
    pub invoice_number: &'a str,
    pub header: &'a InvoiceHeader,
    pub items: &'a [LineItem],
    pub totals: Totals,
}

/// A rendered invoice, ready to hand to a `DocumentExporter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInvoice {
    /// The invoice number, as entered. Exporters use it to name files.
    pub invoice_number: String,
    /// The document title.
    pub title: String,
    /// The complete HTML document.
    pub html: String,
}

/// Escapes text for use in HTML element content or a quoted attribute value, the same way the
/// invoice template escapes every value it embeds.
pub fn escape_html(text: &str) -> String {
    MarkupDisplay::new_unsafe(text, Html).to_string()
}

/// Renders the invoice. Every piece of user-supplied text is escaped.
pub fn render(snapshot: &InvoiceSnapshot<'_>, options: &RenderOptions) -> Res<RenderedInvoice> {
    Ok(RenderedInvoice {
        invoice_number: snapshot.invoice_number.to_string(),
        title: format!("Invoice {}", snapshot.invoice_number),
        html: render_html(snapshot, options)?,
    })
}

/// Renders the invoice as a complete HTML document.
pub fn render_html(snapshot: &InvoiceSnapshot<'_>, options: &RenderOptions) -> Res<String> {
    InvoiceTemplate::new(snapshot, options)
        .render()
        .with_context(|| format!("Unable to render invoice {}", snapshot.invoice_number))
}

/// Formats a tax rate fraction as a percentage with one decimal place, e.g. `0.08` -> `8.0`.
pub fn tax_percent(tax_rate: Decimal) -> String {
    let percent = tax_rate
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.1}")
}

/// The document, see `templates/invoice.html`. The `.html` extension turns on escaping of every
/// value the template embeds.
#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    number: &'a str,
    header: &'a InvoiceHeader,
    rows: Vec<Row<'a>>,
    totals: Totals,
    tax_percent: String,
    logo: &'a str,
    footer: &'a str,
    auto_print: bool,
}

struct Row<'a> {
    description: &'a str,
    quantity: Decimal,
    rate: Amount,
    amount: Amount,
}

impl<'a> InvoiceTemplate<'a> {
    fn new(snapshot: &InvoiceSnapshot<'a>, options: &'a RenderOptions) -> Self {
        Self {
            number: snapshot.invoice_number,
            header: snapshot.header,
            rows: snapshot.items.iter().map(Row::from).collect(),
            totals: snapshot.totals,
            tax_percent: tax_percent(snapshot.header.tax_rate),
            logo: &options.logo_path,
            footer: &options.footer,
            auto_print: options.auto_print,
        }
    }
}

impl<'a> From<&'a LineItem> for Row<'a> {
    fn from(item: &'a LineItem) -> Self {
        Self {
            description: item.description(),
            quantity: item.quantity().normalize(),
            rate: Amount::new(item.unit_price()),
            amount: Amount::new(item.line_total()),
        }
    }
}
