use clap::Parser;
use invoicer::args::{Args, Command};
use invoicer::ids::RandomIds;
use invoicer::{commands, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().invoicer_home().path();
    let today = chrono::Utc::now().date_naive();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::New(new_args) => {
            let config = commands::load_config(home).await?;
            commands::new_draft(
                &config,
                today,
                new_args.sample(),
                new_args.out(),
                &mut RandomIds,
            )
            .await?
            .print()
        }

        Command::Totals(totals_args) => {
            let config = commands::load_config(home).await?;
            commands::totals(&config, today, totals_args.draft())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            let config = commands::load_config(home).await?;
            commands::export(
                &config,
                today,
                export_args.draft(),
                export_args.out(),
                export_args.stdout(),
                export_args.no_print(),
                &mut RandomIds,
            )
            .await?
            .print()
        }

        Command::Edit(edit_args) => {
            let config = commands::load_config(home).await?;
            commands::edit(&config, today, edit_args.draft(), edit_args.sample())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
