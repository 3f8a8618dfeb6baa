//! User events for an interactive editing session, parsed from single lines of input.

use crate::model::{HeaderField, LineItemField};
use anyhow::{bail, Context};
use std::path::PathBuf;
use std::str::FromStr;

/// One discrete thing a user can do to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// `add`
    AddItem,
    /// `remove <id>`
    RemoveItem(u64),
    /// `item <id> <field> <value...>`
    UpdateItem {
        id: u64,
        field: LineItemField,
        value: String,
    },
    /// `set <field> <value...>`. The tax rate is given as a percentage.
    SetHeader { field: HeaderField, value: String },
    /// `set number <value...>`
    SetInvoiceNumber(String),
    /// `regen`
    RegenerateNumber,
    /// `show`
    Show,
    /// `draft`
    PrintDraft,
    /// `export [path]`
    Export(Option<PathBuf>),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// The text printed for the `help` event.
pub const HELP: &str = "\
Commands:
  add                              add a line item
  remove <id>                      remove a line item
  item <id> <field> <value...>     edit a line item (description, quantity, unit_price)
  set <field> <value...>           edit the header (invoice_date, due_date, client_name,
                                   client_address, project_name, service_period,
                                   payment_terms, tax_rate in percent, number)
  regen                            generate a new invoice number
  show                             print the invoice and its totals
  draft                            print the invoice as a draft file
  export [path]                    render the invoice to HTML
  help                             print this message
  quit                             end the session";

impl FromStr for FormEvent {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = split_word(line);
        let event = match command.to_ascii_lowercase().as_str() {
            "add" => FormEvent::AddItem,
            "remove" | "rm" => FormEvent::RemoveItem(parse_id(rest)?),
            "item" => {
                let (id, rest) = split_word(rest);
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    bail!("Usage: item <id> <field> <value...>")
                }
                FormEvent::UpdateItem {
                    id: parse_id(id)?,
                    field: LineItemField::from_str(field)
                        .with_context(|| format!("Unknown line item field '{field}'"))?,
                    value: value.to_string(),
                }
            }
            "set" => {
                let (field, value) = split_word(rest);
                match field {
                    "" => bail!("Usage: set <field> <value...>"),
                    "number" | "invoice_number" => FormEvent::SetInvoiceNumber(value.to_string()),
                    _ => FormEvent::SetHeader {
                        field: HeaderField::from_str(field)
                            .with_context(|| format!("Unknown header field '{field}'"))?,
                        value: value.to_string(),
                    },
                }
            }
            "regen" | "regenerate" => FormEvent::RegenerateNumber,
            "show" => FormEvent::Show,
            "draft" => FormEvent::PrintDraft,
            "export" | "print" => {
                FormEvent::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            "help" | "?" => FormEvent::Help,
            "quit" | "exit" => FormEvent::Quit,
            "" => bail!("Empty command"),
            other => bail!("Unknown command '{other}', type 'help' for a list of commands"),
        };
        Ok(event)
    }
}

/// Splits off the first whitespace-delimited word. The remainder keeps its inner spacing but
/// loses the whitespace that separated it from the word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn parse_id(s: &str) -> anyhow::Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        bail!("A line item id is required")
    }
    s.parse()
        .with_context(|| format!("'{s}' is not a line item id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> FormEvent {
        FormEvent::from_str(s).unwrap()
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("add"), FormEvent::AddItem);
        assert_eq!(parse("  ADD  "), FormEvent::AddItem);
        assert_eq!(parse("remove 3"), FormEvent::RemoveItem(3));
        assert_eq!(parse("regen"), FormEvent::RegenerateNumber);
        assert_eq!(parse("show"), FormEvent::Show);
        assert_eq!(parse("draft"), FormEvent::PrintDraft);
        assert_eq!(parse("quit"), FormEvent::Quit);
        assert_eq!(parse("export"), FormEvent::Export(None));
        assert_eq!(
            parse("export out/inv 1.html"),
            FormEvent::Export(Some(PathBuf::from("out/inv 1.html")))
        );
    }

    #[test]
    fn test_update_item_keeps_inner_spaces() {
        assert_eq!(
            parse("item 2 description Software  Development - Frontend"),
            FormEvent::UpdateItem {
                id: 2,
                field: LineItemField::Description,
                value: "Software  Development - Frontend".to_string(),
            }
        );
        assert_eq!(
            parse("item 2 unitPrice 12.5"),
            FormEvent::UpdateItem {
                id: 2,
                field: LineItemField::UnitPrice,
                value: "12.5".to_string(),
            }
        );
    }

    #[test]
    fn test_update_item_allows_empty_value() {
        assert_eq!(
            parse("item 1 quantity"),
            FormEvent::UpdateItem {
                id: 1,
                field: LineItemField::Quantity,
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_set_header() {
        assert_eq!(
            parse("set client_name TechCorp Inc."),
            FormEvent::SetHeader {
                field: HeaderField::ClientName,
                value: "TechCorp Inc.".to_string(),
            }
        );
        assert_eq!(
            parse("set tax 7.5"),
            FormEvent::SetHeader {
                field: HeaderField::TaxRate,
                value: "7.5".to_string(),
            }
        );
        assert_eq!(
            parse("set number INV-0000AAAA"),
            FormEvent::SetInvoiceNumber("INV-0000AAAA".to_string())
        );
    }

    #[test]
    fn test_errors() {
        assert!(FormEvent::from_str("").is_err());
        assert!(FormEvent::from_str("fly").is_err());
        assert!(FormEvent::from_str("remove").is_err());
        assert!(FormEvent::from_str("remove x").is_err());
        assert!(FormEvent::from_str("item 1").is_err());
        assert!(FormEvent::from_str("item 1 colour red").is_err());
        assert!(FormEvent::from_str("set").is_err());
        assert!(FormEvent::from_str("set colour red").is_err());
    }
}
