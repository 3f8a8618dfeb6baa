//! The interactive editing session behind `invoicer edit`.

use crate::commands::{draft_json, load_draft, Out};
use crate::error::{ErrorType, IntoResult, Res};
use crate::export::{ExportOutcome, FileExporter};
use crate::form::{Draft, FormEvent, InvoiceForm, HELP};
use crate::ids::{IdSource, RandomIds};
use crate::model::Amount;
use crate::render::{tax_percent, RenderOptions};
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Whether the session keeps reading events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An editing session: one form plus everything needed to act on events for it.
///
/// Like the form it wraps, the session always has an invoice number between events. It is
/// generated when the session starts and again whenever it has been cleared.
pub struct Session {
    form: InvoiceForm,
    ids: Box<dyn IdSource>,
    options: RenderOptions,
    exports: PathBuf,
}

impl Session {
    pub fn new(form: InvoiceForm, ids: Box<dyn IdSource>, config: &Config) -> Self {
        let mut session = Self {
            form,
            ids,
            options: config.render_options(),
            exports: config.exports().to_path_buf(),
        };
        session.form.ensure_invoice_number(session.ids.as_mut());
        session
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    /// Reads one event per line from `input` until `quit` or the end of input. Lines that are
    /// not valid events are logged and skipped. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD. Returns the number of events applied.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> Res<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut applied = 0;
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .await
                .context("Unable to read the next command")?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!("The command is not valid UTF-8, invalid bytes were replaced");
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            let event = match FormEvent::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    warn!("{e:#}");
                    continue;
                }
            };
            applied += 1;
            if self.apply(event, out).await? == Flow::Quit {
                break;
            }
        }
        Ok(applied)
    }

    /// Applies a single event and writes any response to `out`.
    pub async fn apply<W>(&mut self, event: FormEvent, out: &mut W) -> Res<Flow>
    where
        W: AsyncWrite + Unpin,
    {
        debug!("Applying {event:?}");
        match event {
            FormEvent::AddItem => {
                let id = self.form.add_item();
                say(out, &format!("Added item {id}")).await?;
            }
            FormEvent::RemoveItem(id) => {
                if self.form.remove_item(id) {
                    say(out, &format!("Removed item {id}")).await?;
                } else {
                    say(out, &format!("There is no item {id}")).await?;
                }
            }
            FormEvent::UpdateItem { id, field, value } => {
                if !self.form.update_item(id, field, &value) {
                    say(out, &format!("There is no item {id}")).await?;
                }
            }
            FormEvent::SetHeader { field, value } => {
                self.form.set_header_field(field, &value);
            }
            FormEvent::SetInvoiceNumber(value) => {
                self.form.set_invoice_number(&value);
            }
            FormEvent::RegenerateNumber => {
                if let Some(number) = self.form.regenerate_invoice_number(self.ids.as_mut()) {
                    say(out, &format!("Invoice number is now {number}")).await?;
                }
            }
            FormEvent::Show => say(out, &summary(&self.form)).await?,
            FormEvent::PrintDraft => say(out, &draft_json(&self.form)?).await?,
            FormEvent::Export(path) => {
                let message = self.export(path.as_deref()).await;
                say(out, &message).await?;
            }
            FormEvent::Help => say(out, HELP).await?,
            FormEvent::Quit => return Ok(Flow::Quit),
        }
        // An empty invoice number is replaced as soon as the edit that cleared it is done.
        self.form.ensure_invoice_number(self.ids.as_mut());
        Ok(Flow::Continue)
    }

    async fn export(&self, path: Option<&Path>) -> String {
        let mut exporter = match path {
            Some(path) => FileExporter::to_file(path),
            None => FileExporter::in_dir(&self.exports),
        };
        match self.form.export(&mut exporter, &self.options).await {
            ExportOutcome::Exported => match exporter.written().last() {
                Some(path) => format!("Exported to '{}'", path.display()),
                None => "Exported".to_string(),
            },
            ExportOutcome::NotReady => "The invoice is not ready to be exported".to_string(),
            ExportOutcome::Aborted => "The export target is unavailable".to_string(),
        }
    }
}

/// Runs an interactive session on stdin. The session starts from the draft at `draft`, from
/// demonstration data with `sample`, or from an empty invoice.
pub async fn edit(
    config: &Config,
    today: NaiveDate,
    draft: Option<&Path>,
    sample: bool,
) -> Result<Out<Draft>> {
    let base = config.base_header(today);
    let form = match draft {
        Some(path) => load_draft(path, base).await.pub_result(ErrorType::Draft)?,
        None if sample => InvoiceForm::sample(base),
        None => InvoiceForm::new(base),
    };

    let mut session = Session::new(form, Box::new(RandomIds), config);
    info!(
        "Editing invoice {}, type 'help' for a list of commands",
        session.form().invoice_number().unwrap_or_default()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let applied = session
        .run(stdin, &mut stdout)
        .await
        .pub_result(ErrorType::Io)?;
    debug!("The session applied {applied} events");

    let form = session.form();
    Ok(Out::new(
        format!(
            "Finished editing invoice {} with {} items, total {}",
            form.invoice_number().unwrap_or_default(),
            form.items().len(),
            form.totals().total()
        ),
        form.to_draft(),
    ))
}

async fn say<W>(out: &mut W, text: &str) -> Res<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(format!("{text}\n").as_bytes())
        .await
        .context("Unable to write the session output")?;
    out.flush().await.context("Unable to flush the session output")
}

/// A plain text view of the form for the terminal.
fn summary(form: &InvoiceForm) -> String {
    let h = form.header();
    let totals = form.totals();
    let mut s = String::new();
    let _ = writeln!(s, "Invoice {}", form.invoice_number().unwrap_or_default());
    let _ = writeln!(
        s,
        "  Date: {}  Due: {}  Terms: {}",
        h.invoice_date, h.due_date, h.payment_terms
    );
    let _ = writeln!(s, "  Client: {}", h.client_name);
    let _ = writeln!(s, "  Address: {}", h.client_address);
    let _ = writeln!(s, "  Project: {}", h.project_name);
    let _ = writeln!(s, "  Service period: {}", h.service_period);
    let _ = writeln!(s, "Items:");
    if form.items().is_empty() {
        let _ = writeln!(s, "  (none)");
    }
    for item in form.items() {
        let _ = writeln!(
            s,
            "  [{}] {}: {} x {} = {}",
            item.id(),
            item.description(),
            item.quantity().normalize(),
            Amount::new(item.unit_price()),
            Amount::new(item.line_total())
        );
    }
    let _ = writeln!(s, "Subtotal: {}", totals.subtotal());
    let _ = writeln!(
        s,
        "Tax ({}%): {}",
        tax_percent(form.tax_rate()),
        totals.tax_amount()
    );
    let _ = write!(s, "Total: {}", totals.total());
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::InvoiceHeader;
    use crate::utils;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    async fn session(t: &TempDir, form: InvoiceForm) -> Session {
        let config = Config::load_or_default(t.path()).await.unwrap();
        Session::new(form, Box::new(SequentialIds::new(1)), &config)
    }

    async fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_session_starts_with_number() {
        let t = TempDir::new().unwrap();
        let s = session(&t, InvoiceForm::new(InvoiceHeader::dated(today(), 7))).await;
        assert_eq!(s.form().invoice_number(), Some("INV-00000001"));
    }

    #[tokio::test]
    async fn test_session_script() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::new(InvoiceHeader::dated(today(), 7))).await;
        let script = "\
add
item 1 description Design work
item 1 quantity 2
item 1 unit_price 10
add
item 2 price 5
set tax 10
bogus command

remove 9
show
regen
quit
add
";
        let output = run(&mut s, script).await;

        let form = s.form();
        assert_eq!(form.items().len(), 2);
        assert_eq!(form.tax_rate(), Decimal::new(1, 1));
        assert_eq!(form.totals().total().to_string(), "$27.50");
        assert_eq!(form.invoice_number(), Some("INV-00000002"));

        assert!(output.contains("Added item 1\n"));
        assert!(output.contains("There is no item 9\n"));
        assert!(output.contains("  [1] Design work: 2 x $10.00 = $20.00\n"));
        assert!(output.contains("Tax (10.0%): $2.50\n"));
        assert!(output.contains("Total: $27.50\n"));
        assert!(output.contains("Invoice number is now INV-00000002\n"));
        assert!(!output.contains("Added item 3"));
    }

    #[tokio::test]
    async fn test_session_apply_counts_and_end_of_input() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::new(InvoiceHeader::dated(today(), 7))).await;
        let mut out = Vec::new();
        let applied = s.run("add\nnope\nadd".as_bytes(), &mut out).await.unwrap();
        assert_eq!(applied, 2);
        assert_eq!(s.form().items().len(), 2);
    }

    #[tokio::test]
    async fn test_session_survives_invalid_utf8() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::new(InvoiceHeader::dated(today(), 7))).await;
        let mut out = Vec::new();
        let input: &[u8] = b"add\nadd\nitem 1 description caf\xE9\r\nadd\n";
        let applied = s.run(input, &mut out).await.unwrap();
        assert_eq!(applied, 4);
        let items = s.form().items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].description(), "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_session_cleared_number_is_regenerated() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::new(InvoiceHeader::dated(today(), 7))).await;
        run(&mut s, "set number INV-0000F00D\n").await;
        assert_eq!(s.form().invoice_number(), Some("INV-0000F00D"));
        run(&mut s, "set number\n").await;
        assert_eq!(s.form().invoice_number(), Some("INV-00000002"));
    }

    #[tokio::test]
    async fn test_session_draft_output() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::sample(InvoiceHeader::dated(today(), 7))).await;
        let output = run(&mut s, "draft\n").await;
        let draft: Draft = serde_json::from_str(&output).unwrap();
        assert_eq!(draft.invoice_number.as_deref(), Some("INV-00000001"));
        assert_eq!(draft.items.len(), 3);
    }

    #[tokio::test]
    async fn test_session_export() {
        let t = TempDir::new().unwrap();
        let mut s = session(&t, InvoiceForm::sample(InvoiceHeader::dated(today(), 7))).await;
        let missing = t.path().join("missing").join("x.html");
        let script = format!("export\nexport {}\nadd\n", missing.display());
        let output = run(&mut s, &script).await;

        let expected = t.path().join("exports").join("INV-00000001.html");
        assert!(output.contains(&format!("Exported to '{}'", expected.display())));
        assert!(output.contains("The export target is unavailable"));
        assert_eq!(s.form().items().len(), 4);

        let html = utils::read(&expected).await.unwrap();
        assert!(html.contains("TechCorp Inc."));
        assert!(html.contains("$7342.92"));
    }

    #[test]
    fn test_summary_without_items() {
        let mut form = InvoiceForm::new(InvoiceHeader::dated(today(), 7));
        form.set_invoice_number("INV-00000001");
        let text = summary(&form);
        assert!(text.starts_with("Invoice INV-00000001\n"));
        assert!(text.contains("  Date: 2024-12-01  Due: 2024-12-08  Terms: Net 30\n"));
        assert!(text.contains("  (none)\n"));
        assert!(text.ends_with("Total: $0.00"));
    }
}
