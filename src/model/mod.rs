//! Types that represent an invoice being edited: line items, header fields, the invoice number
//! and the totals derived from them.
mod amount;
mod header;
mod invoice_number;
mod line_item;
mod number;
mod totals;

pub use amount::Amount;
pub use header::{
    HeaderField, InvoiceHeader, DEFAULT_DUE_IN_DAYS, DEFAULT_PAYMENT_TERMS, DEFAULT_TAX_RATE,
};
pub(crate) use header::percent_to_fraction;
pub use invoice_number::InvoiceNumber;
pub use line_item::{LineItem, LineItemField, LineItems};
pub use number::coerce_number;
pub use totals::Totals;
