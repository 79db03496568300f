//! CLI command for treasury reports

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::{TreasuryError, TreasuryResult};
use crate::export::{write_report, ReportFormat};
use crate::storage::Storage;

use super::{find_company, WindowArgs};

/// Arguments of `treasury report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Company name or ID
    pub company: String,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> TreasuryResult<()> {
    let company = find_company(storage, &args.company)?;
    let window = args.window.resolve()?;
    let format = args.format.unwrap_or(settings.default_report_format);

    let report = storage.report(company.id, window)?;

    match args.output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                TreasuryError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_report(&report, format, settings, &mut writer)?;
            writer
                .flush()
                .map_err(|e| TreasuryError::Export(e.to_string()))?;
            println!("Report for {} exported to: {}", company.name, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            if format == ReportFormat::Table {
                writeln!(writer, "{}", company.name)
                    .map_err(|e| TreasuryError::Export(e.to_string()))?;
            }
            write_report(&report, format, settings, &mut writer)?;
        }
    }

    Ok(())
}
