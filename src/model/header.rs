use crate::model::coerce_number;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The default tax rate, 8%.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// The default number of days between the invoice date and the due date.
pub const DEFAULT_DUE_IN_DAYS: u32 = 7;

/// The default payment terms.
pub const DEFAULT_PAYMENT_TERMS: &str = "Net 30";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client, project and billing metadata shown at the top of an invoice.
///
/// Every text field is free text exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceHeader {
    pub invoice_date: String,
    pub due_date: String,
    pub client_name: String,
    pub client_address: String,
    pub project_name: String,
    pub service_period: String,
    pub payment_terms: String,
    /// A fraction, e.g. `0.08` for 8%.
    pub tax_rate: Decimal,
}

impl InvoiceHeader {
    /// Creates a header dated `today` and due `due_in_days` later.
    pub fn dated(today: NaiveDate, due_in_days: u32) -> Self {
        let due = today
            .checked_add_days(Days::new(u64::from(due_in_days)))
            .unwrap_or(today);
        Self {
            invoice_date: today.format(DATE_FORMAT).to_string(),
            due_date: due.format(DATE_FORMAT).to_string(),
            client_name: String::new(),
            client_address: String::new(),
            project_name: String::new(),
            service_period: String::new(),
            payment_terms: DEFAULT_PAYMENT_TERMS.to_string(),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Sets a header field from raw user input. `tax_rate` is read as a percentage, so `"8"`
    /// becomes `0.08`, and malformed input becomes `0`.
    pub fn apply(&mut self, field: HeaderField, raw: &str) {
        let text = raw.to_string();
        match field {
            HeaderField::InvoiceDate => self.invoice_date = text,
            HeaderField::DueDate => self.due_date = text,
            HeaderField::ClientName => self.client_name = text,
            HeaderField::ClientAddress => self.client_address = text,
            HeaderField::ProjectName => self.project_name = text,
            HeaderField::ServicePeriod => self.service_period = text,
            HeaderField::PaymentTerms => self.payment_terms = text,
            HeaderField::TaxRate => self.tax_rate = percent_to_fraction(raw),
        }
    }
}

impl Default for InvoiceHeader {
    fn default() -> Self {
        Self::dated(chrono::Utc::now().date_naive(), DEFAULT_DUE_IN_DAYS)
    }
}

/// Converts a typed percentage into a fraction.
pub(crate) fn percent_to_fraction(raw: &str) -> Decimal {
    coerce_number(raw)
        .checked_div(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// The editable fields of an `InvoiceHeader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    #[serde(alias = "date")]
    InvoiceDate,
    #[serde(alias = "due")]
    DueDate,
    #[serde(alias = "client")]
    ClientName,
    #[serde(alias = "address")]
    ClientAddress,
    #[serde(alias = "project")]
    ProjectName,
    #[serde(alias = "period", alias = "services_period")]
    ServicePeriod,
    #[serde(alias = "terms")]
    PaymentTerms,
    #[serde(alias = "tax")]
    TaxRate,
}

serde_plain::derive_display_from_serialize!(HeaderField);
serde_plain::derive_fromstr_from_deserialize!(HeaderField);
