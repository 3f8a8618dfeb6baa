use crate::commands::{load_draft, Out};
use crate::error::{ErrorType, IntoResult};
use crate::export::{ExportOutcome, FileExporter, StdoutExporter};
use crate::ids::IdSource;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What `invoicer export` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub invoice_number: String,
    pub outcome: ExportOutcome,
    /// The file written, if the document went to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Where `export` sends the rendered document.
enum Destination<'a> {
    Stdout,
    File(&'a Path),
    Exports,
}

/// Renders the draft at `draft` to HTML.
///
/// The document goes to `out`, to stdout when `stdout` is set, or otherwise to
/// `<home>/exports/<invoice-number>.html`. A draft without an invoice number gets a generated one
/// for this export only. An unavailable target is reported in the returned message, not as an
/// error.
pub async fn export(
    config: &Config,
    today: NaiveDate,
    draft: &Path,
    out: Option<&Path>,
    stdout: bool,
    no_print: bool,
    ids: &mut dyn IdSource,
) -> Result<Out<ExportReport>> {
    let mut form = load_draft(draft, config.base_header(today))
        .await
        .pub_result(ErrorType::Draft)?;
    if !form.is_ready() {
        let number = form.ensure_invoice_number(ids);
        info!("The draft has no invoice number, using {number} for this export");
    }

    let mut options = config.render_options();
    if no_print {
        options.auto_print = false;
    }

    let destination = match (stdout, out) {
        (true, _) => Destination::Stdout,
        (false, Some(path)) => Destination::File(path),
        (false, None) => Destination::Exports,
    };

    let (outcome, path) = match destination {
        Destination::Stdout => (form.export(&mut StdoutExporter, &options).await, None),
        Destination::File(path) => {
            let mut exporter = FileExporter::to_file(path);
            let outcome = form.export(&mut exporter, &options).await;
            (outcome, exporter.written().last().cloned())
        }
        Destination::Exports => {
            let mut exporter = FileExporter::in_dir(config.exports());
            let outcome = form.export(&mut exporter, &options).await;
            (outcome, exporter.written().last().cloned())
        }
    };

    let invoice_number = form.invoice_number().unwrap_or_default().to_string();
    let message = match (outcome, &path) {
        (ExportOutcome::Exported, Some(path)) => {
            format!("Exported invoice {invoice_number} to '{}'", path.display())
        }
        (ExportOutcome::Exported, None) => format!("Exported invoice {invoice_number}"),
        (ExportOutcome::NotReady, _) => {
            format!("Invoice {invoice_number} is not ready to be exported")
        }
        (ExportOutcome::Aborted, _) => {
            format!("The export target for invoice {invoice_number} is unavailable")
        }
    };

    Ok(Out::new(
        message,
        ExportReport {
            invoice_number,
            outcome,
            path,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::utils;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    async fn setup(t: &TempDir, json: &str) -> (Config, PathBuf) {
        let config = Config::create(t.path().join("home")).await.unwrap();
        let draft = t.path().join("draft.json");
        utils::write(&draft, json).await.unwrap();
        (config, draft)
    }

    #[tokio::test]
    async fn test_export_to_exports_dir() {
        let t = TempDir::new().unwrap();
        let (config, draft) = setup(
            &t,
            r#"{"invoice_number": "INV-0000CAFE", "header": {"client_name": "A & B"},
                "items": [{"description": "<b>Work</b>", "quantity": 2, "unit_price": 10}]}"#,
        )
        .await;

        let out = export(
            &config,
            today(),
            &draft,
            None,
            false,
            true,
            &mut SequentialIds::new(1),
        )
        .await
        .unwrap();

        let report = out.structure().unwrap();
        let expected = config.exports().join("INV-0000CAFE.html");
        assert_eq!(report.outcome, ExportOutcome::Exported);
        assert_eq!(report.path.as_deref(), Some(expected.as_path()));

        let html = utils::read(&expected).await.unwrap();
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("&lt;b&gt;Work"));
        assert!(!html.contains("<b>Work"));
        assert!(html.contains("$21.60"));
        assert!(!html.contains("window.print"));
    }

    #[tokio::test]
    async fn test_export_generates_missing_number() {
        let t = TempDir::new().unwrap();
        let (config, draft) = setup(&t, "{}").await;
        let path = t.path().join("out.html");

        let out = export(
            &config,
            today(),
            &draft,
            Some(&path),
            false,
            false,
            &mut SequentialIds::new(0xABC),
        )
        .await
        .unwrap();

        let report = out.structure().unwrap();
        assert_eq!(report.invoice_number, "INV-00000ABC");
        assert_eq!(report.outcome, ExportOutcome::Exported);
        let html = utils::read(&path).await.unwrap();
        assert!(html.contains("INV-00000ABC"));
        assert!(html.contains("window.print"));
    }

    #[tokio::test]
    async fn test_export_unavailable_target_is_not_an_error() {
        let t = TempDir::new().unwrap();
        let (config, draft) = setup(&t, r#"{"invoice_number": "INV-00000001"}"#).await;
        let path = t.path().join("missing").join("out.html");

        let out = export(
            &config,
            today(),
            &draft,
            Some(&path),
            false,
            false,
            &mut SequentialIds::new(1),
        )
        .await
        .unwrap();

        let report = out.structure().unwrap();
        assert_eq!(report.outcome, ExportOutcome::Aborted);
        assert!(report.path.is_none());
        assert!(out.message().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_export_bad_draft() {
        let t = TempDir::new().unwrap();
        let (config, draft) = setup(&t, "[1, 2").await;
        let err = export(
            &config,
            today(),
            &draft,
            None,
            false,
            false,
            &mut SequentialIds::new(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Draft);
    }
}
