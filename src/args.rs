//! These structs provide the CLI interface for the invoicer CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// invoicer: build an invoice from line items and render it as a print-ready HTML document.
///
/// Invoices are edited either interactively with `invoicer edit` or by writing a JSON draft
/// file (see `invoicer new`). Totals are always computed from the line items and the tax rate.
/// The finished invoice is exported as a standalone HTML file that opens the print dialog
/// when viewed in a browser.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory with a default `config.json` and an `exports` directory.
    ///
    /// This is optional. Without a config file every command uses the default settings. Edit
    /// the created `config.json` to change the default tax rate, payment terms, logo or footer.
    Init,
    /// Write a new draft file with a freshly generated invoice number.
    New(NewArgs),
    /// Print the subtotal, tax and total of a draft file.
    Totals(TotalsArgs),
    /// Render a draft file to a print-ready HTML document.
    Export(ExportArgs),
    /// Edit an invoice interactively, one command per line on stdin. Type `help` for the list.
    Edit(EditArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where invoicer configuration and exports are held. Defaults to ~/invoicer
    #[arg(long, env = "INVOICER_HOME", default_value_t = default_invoicer_home())]
    invoicer_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, invoicer_home: PathBuf) -> Self {
        Self {
            log_level,
            invoicer_home: invoicer_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn invoicer_home(&self) -> &DisplayPath {
        &self.invoicer_home
    }
}

/// (Not shown): Args for the `invoicer new` command.
#[derive(Debug, Parser, Clone)]
pub struct NewArgs {
    /// Fill the draft with demonstration data.
    #[arg(long)]
    sample: bool,

    /// Where to write the draft. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl NewArgs {
    pub fn new(sample: bool, out: Option<PathBuf>) -> Self {
        Self { sample, out }
    }

    pub fn sample(&self) -> bool {
        self.sample
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// (Not shown): Args for the `invoicer totals` command.
#[derive(Debug, Parser, Clone)]
pub struct TotalsArgs {
    /// The draft file to read.
    draft: PathBuf,
}

impl TotalsArgs {
    pub fn new(draft: impl Into<PathBuf>) -> Self {
        Self {
            draft: draft.into(),
        }
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }
}

/// (Not shown): Args for the `invoicer export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The draft file to render.
    draft: PathBuf,

    /// The HTML file to write. Defaults to $INVOICER_HOME/exports/<invoice-number>.html
    #[arg(long, conflicts_with = "stdout")]
    out: Option<PathBuf>,

    /// Write the HTML document to stdout instead of a file.
    #[arg(long)]
    stdout: bool,

    /// Do not open the print dialog when the document is viewed.
    #[arg(long)]
    no_print: bool,
}

impl ExportArgs {
    pub fn new(draft: impl Into<PathBuf>, out: Option<PathBuf>, stdout: bool, no_print: bool) -> Self {
        Self {
            draft: draft.into(),
            out,
            stdout,
            no_print,
        }
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }

    pub fn stdout(&self) -> bool {
        self.stdout
    }

    pub fn no_print(&self) -> bool {
        self.no_print
    }
}

/// (Not shown): Args for the `invoicer edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// Start from this draft file instead of an empty invoice.
    #[arg(long, conflicts_with = "sample")]
    draft: Option<PathBuf>,

    /// Start from demonstration data instead of an empty invoice.
    #[arg(long)]
    sample: bool,
}

impl EditArgs {
    pub fn new(draft: Option<PathBuf>, sample: bool) -> Self {
        Self { draft, sample }
    }

    pub fn draft(&self) -> Option<&Path> {
        self.draft.as_deref()
    }

    pub fn sample(&self) -> bool {
        self.sample
    }
}

fn default_invoicer_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("invoicer"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --invoicer-home or INVOICER_HOME instead of relying on the \
                default invoicer home directory.",
            );
            PathBuf::from("invoicer")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
