use crate::commands::{draft_json, write_stdout, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::{Draft, InvoiceForm};
use crate::ids::IdSource;
use crate::{utils, Config, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

/// Creates a new draft dated `today` with a freshly generated invoice number and writes it to
/// `out`, or to stdout when `out` is `None`.
///
/// With `sample` the draft is filled with demonstration data.
pub async fn new_draft(
    config: &Config,
    today: NaiveDate,
    sample: bool,
    out: Option<&Path>,
    ids: &mut dyn IdSource,
) -> Result<Out<Draft>> {
    let header = config.base_header(today);
    let mut form = if sample {
        InvoiceForm::sample(header)
    } else {
        InvoiceForm::new(header)
    };
    let number = form.ensure_invoice_number(ids).to_string();
    let json = draft_json(&form).pub_result(ErrorType::Draft)?;

    match out {
        Some(path) => {
            utils::write(path, &json).await.pub_result(ErrorType::Io)?;
            info!("Wrote draft {number} to {}", path.display());
        }
        None => write_stdout(&json).await.pub_result(ErrorType::Io)?,
    }

    Ok(Out::new(
        format!("Created invoice {number}"),
        form.to_draft(),
    ))
}
