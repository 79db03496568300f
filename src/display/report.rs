//! Report display formatting

use std::collections::HashMap;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::engine::{Bucket, Contribution, Diagnostics, Source};
use crate::models::{CategoryId, Money};
use crate::reports::TreasuryReport;

#[derive(Tabled)]
struct ReportLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Own")]
    own: String,
    #[tabled(rename = "Rolled")]
    rolled: String,
    #[tabled(rename = "Inflow")]
    inflow: String,
    #[tabled(rename = "Outflow")]
    outflow: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct ContributionLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn money(amount: Money, settings: &Settings) -> String {
    amount.format_with_symbol(&settings.currency_symbol)
}

/// Format a date with the user's format, falling back to ISO for bad patterns
pub(crate) fn date(value: NaiveDate, settings: &Settings) -> String {
    let valid = !StrftimeItems::new(&settings.date_format).any(|item| matches!(item, Item::Error));
    if valid {
        value.format(&settings.date_format).to_string()
    } else {
        value.to_string()
    }
}

/// Format a treasury report for the terminal
pub fn format_report(report: &TreasuryReport, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Treasury Report: {} to {} (exclusive)\n",
        date(report.window_from, settings),
        date(report.window_to, settings)
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let mut lines: Vec<ReportLine> = report
        .categories
        .iter()
        .filter(|row| !(settings.hide_empty_rows && row.is_empty()))
        .map(|row| ReportLine {
            category: format!("{}{}", "  ".repeat(row.depth), row.name),
            own: money(row.self_total, settings),
            rolled: money(row.rolled_total, settings),
            inflow: money(row.rolled_inflow, settings),
            outflow: money(row.rolled_outflow, settings),
            count: row.rolled_occurrences,
        })
        .collect();

    if report.uncategorized_occurrences > 0 || !settings.hide_empty_rows {
        lines.push(ReportLine {
            category: "Uncategorized".to_string(),
            own: money(report.uncategorized, settings),
            rolled: money(report.uncategorized, settings),
            inflow: String::new(),
            outflow: String::new(),
            count: report.uncategorized_occurrences,
        });
    }

    let mut table = Table::new(lines);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format!(
        "Total Inflow:  {}\n",
        money(report.total_inflow, settings)
    ));
    output.push_str(&format!(
        "Total Outflow: {}\n",
        money(report.total_outflow, settings)
    ));
    output.push_str(&format!("Net:           {}\n", money(report.net, settings)));

    if !report.diagnostics.is_empty() {
        output.push('\n');
        output.push_str(&format_diagnostics(&report.diagnostics));
    }

    output
}

/// Format diagnostics as a warning list
pub fn format_diagnostics(diagnostics: &Diagnostics) -> String {
    let mut output = format!("Warnings ({}):\n", diagnostics.len());
    for diagnostic in diagnostics {
        output.push_str(&format!("  ! {}\n", diagnostic));
    }
    output
}

/// Format a contribution listing as a table
pub fn format_contributions(
    contributions: &[Contribution],
    category_names: &HashMap<CategoryId, String>,
    settings: &Settings,
) -> String {
    if contributions.is_empty() {
        return "No transactions or occurrences in this window.\n".to_string();
    }

    let lines: Vec<ContributionLine> = contributions
        .iter()
        .map(|c| ContributionLine {
            date: date(c.date, settings),
            source: match c.source {
                Source::Transaction(_) => "transaction".to_string(),
                Source::Revenue(_) => "revenue".to_string(),
                Source::Cost(_) => "cost".to_string(),
            },
            label: c.label.clone(),
            category: match c.bucket {
                Bucket::Category(id) => category_names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| id.to_string()),
                Bucket::Uncategorized => "-".to_string(),
            },
            amount: money(c.amount, settings),
        })
        .collect();

    let total: Money = contributions.iter().map(|c| c.amount).sum();

    let mut table = Table::new(lines);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()));

    format!(
        "{}\n{} entries, net {}\n",
        table,
        contributions.len(),
        money(total, settings)
    )
}
