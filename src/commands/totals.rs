use crate::commands::{load_draft, write_stdout, Out};
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::Amount;
use crate::render::tax_percent;
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// The totals of a draft as printed by `invoicer totals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    pub items: usize,
    pub subtotal: Amount,
    /// The tax rate in percent, one decimal place.
    pub tax_percent: String,
    pub tax_amount: Amount,
    pub total: Amount,
}

/// Computes the totals of the draft at `draft` and prints them to stdout as JSON.
pub async fn totals(config: &Config, today: NaiveDate, draft: &Path) -> Result<Out<TotalsReport>> {
    let report = compute(config, today, draft)
        .await
        .pub_result(ErrorType::Draft)?;
    let json = serde_json::to_string_pretty(&report)
        .context("Unable to serialize the totals")
        .pub_result(ErrorType::Draft)?;
    write_stdout(&json).await.pub_result(ErrorType::Io)?;

    let message = format!(
        "Subtotal {}, tax ({}%) {}, total {}",
        report.subtotal, report.tax_percent, report.tax_amount, report.total
    );
    Ok(Out::new(message, report))
}

async fn compute(config: &Config, today: NaiveDate, draft: &Path) -> Res<TotalsReport> {
    let form = load_draft(draft, config.base_header(today)).await?;
    let totals = form.totals();
    Ok(TotalsReport {
        invoice_number: form.invoice_number().map(str::to_string),
        items: form.items().len(),
        subtotal: totals.subtotal(),
        tax_percent: tax_percent(form.tax_rate()),
        tax_amount: totals.tax_amount(),
        total: totals.total(),
    })
}
