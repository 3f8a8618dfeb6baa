//! invoicer: edit invoice line items, derive the totals and render a print-ready HTML invoice.
//!
//! The editable state lives in `InvoiceForm`. Totals are always derived from its line items and
//! tax rate, and the rendered document is handed to a `DocumentExporter`.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod export;
pub mod form;
pub mod ids;
pub mod model;
pub mod render;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use form::{Draft, FormEvent, InvoiceForm};
