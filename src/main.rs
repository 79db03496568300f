use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use treasury::cli::{
    handle_company_command, handle_import_command, handle_occurrences_command,
    handle_report_command, handle_tree_command, CompanyCommands, ReportArgs, WindowArgs,
};
use treasury::config::{paths::TreasuryPaths, settings::Settings};
use treasury::storage::Storage;

#[derive(Parser)]
#[command(
    name = "treasury",
    author = "Kaylee Beyene",
    version,
    about = "Multi-tenant treasury dashboard",
    long_about = "Treasury projects recurring costs and revenues into a reporting \
                  window, merges them with recorded transactions and rolls the \
                  totals up each company's category tree."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory (overrides TREASURY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Company management commands
    #[command(subcommand)]
    Company(CompanyCommands),

    /// Import a JSON or YAML ledger snapshot
    Import {
        /// Snapshot file (.json, .yaml or .yml)
        file: PathBuf,
    },

    /// Build a treasury report for one company
    Report(ReportArgs),

    /// Show a company's category tree
    Tree {
        /// Company name or ID
        company: String,
    },

    /// List every transaction and projected occurrence in a window
    #[command(alias = "occ")]
    Occurrences {
        /// Company name or ID
        company: String,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths = match cli.data_dir {
        Some(dir) => TreasuryPaths::with_base_dir(dir),
        None => TreasuryPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Company(cmd)) => handle_company_command(&storage, cmd)?,
        Some(Commands::Import { file }) => handle_import_command(&storage, &file)?,
        Some(Commands::Report(args)) => handle_report_command(&storage, &settings, args)?,
        Some(Commands::Tree { company }) => handle_tree_command(&storage, &company)?,
        Some(Commands::Occurrences { company, window }) => {
            handle_occurrences_command(&storage, &settings, &company, &window)?
        }
        Some(Commands::Config) => {
            println!("Treasury Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!("  Date format:           {}", settings.date_format);
            println!("  Default report format: {}", settings.default_report_format);
            println!("  Hide empty rows:       {}", settings.hide_empty_rows);
            if !paths.is_initialized() {
                settings.save(&paths)?;
                println!();
                println!("Default settings written to {}", paths.settings_file().display());
            }
        }
        None => {
            println!("Treasury - multi-tenant treasury dashboard");
            println!();
            println!("Run 'treasury --help' for usage information.");
        }
    }

    Ok(())
}
