//! The draft file: a JSON description of a form that the CLI reads and writes.
//!
//! ```json
//! {
//!   "invoice_number": "INV-1A2B3C4D",
//!   "header": { "client_name": "Acme", "tax_rate": "0.08" },
//!   "items": [ { "description": "Design", "quantity": 2, "unit_price": "10.50" } ]
//! }
//! ```
//!
//! Every field is optional. The tax rate and item quantities and prices may be numbers or strings.
//! Loading a draft replays each item through the same editing operations a user would perform, so
//! malformed numbers become 0 rather than failing the load. Numbers are read with their full
//! text, so even a literal too large for a float, like `1e400`, loads (as 0).

use crate::form::InvoiceForm;
use crate::model::{coerce_number, HeaderField, InvoiceHeader, LineItemField};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use tracing::trace;

/// The serialized form of an `InvoiceForm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub header: DraftHeader,
    #[serde(default)]
    pub items: Vec<DraftItem>,
}

/// Header fields of a draft. Missing fields keep the defaults of the form being loaded into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "services_period")]
    pub service_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    /// A fraction, e.g. `0.08` for 8%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<DraftValue>,
}

/// One line item of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftItem {
    #[serde(default)]
    pub description: String,
    #[serde(default = "DraftValue::one")]
    pub quantity: DraftValue,
    #[serde(default = "DraftValue::zero", alias = "unitPrice")]
    pub unit_price: DraftValue,
}

/// A numeric field as it appears in a draft. Numbers and strings are read as typed input. Any
/// other JSON value reads as empty input, which coerces to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DraftValue {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for DraftValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => DraftValue::Number(n),
            serde_json::Value::String(s) => DraftValue::Text(s),
            other => DraftValue::Other(other),
        })
    }
}

impl DraftValue {
    fn one() -> Self {
        DraftValue::Text("1".to_string())
    }

    fn zero() -> Self {
        DraftValue::Text("0".to_string())
    }
}

impl Display for DraftValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftValue::Number(n) => Display::fmt(n, f),
            DraftValue::Text(s) => f.write_str(s),
            DraftValue::Other(_) => Ok(()),
        }
    }
}

impl Draft {
    /// Builds a form starting from `base`, then applying this draft on top of it.
    ///
    /// The invoice number, if the draft has one, is kept as-is. Otherwise the form is left without
    /// one, to be generated by `InvoiceForm::ensure_invoice_number`.
    pub fn into_form(self, base: InvoiceHeader) -> InvoiceForm {
        let mut form = InvoiceForm::new(base);
        if let Some(number) = &self.invoice_number {
            form.set_invoice_number(number);
        }

        let h = self.header;
        let text_fields = [
            (HeaderField::InvoiceDate, h.invoice_date),
            (HeaderField::DueDate, h.due_date),
            (HeaderField::ClientName, h.client_name),
            (HeaderField::ClientAddress, h.client_address),
            (HeaderField::ProjectName, h.project_name),
            (HeaderField::ServicePeriod, h.service_period),
            (HeaderField::PaymentTerms, h.payment_terms),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                form.set_header_field(field, &value);
            }
        }
        if let Some(tax_rate) = h.tax_rate {
            form.set_tax_rate(coerce_number(&tax_rate.to_string()));
        }

        for item in self.items {
            let id = form.add_item();
            form.update_item(id, LineItemField::Description, &item.description);
            form.update_item(id, LineItemField::Quantity, &item.quantity.to_string());
            form.update_item(id, LineItemField::UnitPrice, &item.unit_price.to_string());
            trace!("Loaded draft item {id}");
        }
        form
    }
}

impl From<&InvoiceForm> for Draft {
    fn from(form: &InvoiceForm) -> Self {
        let h = form.header();
        Self {
            invoice_number: form.invoice_number().map(str::to_string),
            header: DraftHeader {
                invoice_date: Some(h.invoice_date.clone()),
                due_date: Some(h.due_date.clone()),
                client_name: Some(h.client_name.clone()),
                client_address: Some(h.client_address.clone()),
                project_name: Some(h.project_name.clone()),
                service_period: Some(h.service_period.clone()),
                payment_terms: Some(h.payment_terms.clone()),
                tax_rate: Some(DraftValue::Text(h.tax_rate.to_string())),
            },
            items: form
                .items()
                .iter()
                .map(|item| DraftItem {
                    description: item.description().to_string(),
                    quantity: DraftValue::Text(item.quantity().normalize().to_string()),
                    unit_price: DraftValue::Text(item.unit_price().normalize().to_string()),
                })
                .collect(),
        }
    }
}

impl InvoiceForm {
    /// Captures the current state as a `Draft`.
    pub fn to_draft(&self) -> Draft {
        Draft::from(self)
    }
}
