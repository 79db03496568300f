//! CLI command listing every dated amount inside a window

use std::collections::HashMap;

use crate::config::Settings;
use crate::display::{format_contributions, format_diagnostics};
use crate::error::TreasuryResult;
use crate::reports::ContributionListing;
use crate::storage::{LedgerRepository, Storage};

use super::{find_company, WindowArgs};

/// Handle the occurrences command
pub fn handle_occurrences_command(
    storage: &Storage,
    settings: &Settings,
    company: &str,
    window: &WindowArgs,
) -> TreasuryResult<()> {
    let company = find_company(storage, company)?;
    let window = window.resolve()?;

    let listing = ContributionListing::generate(storage, company.id, window)?;
    let category_names: HashMap<_, _> = storage
        .list_categories(company.id)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    println!("{} {}", company.name, window);
    print!(
        "{}",
        format_contributions(&listing.contributions, &category_names, settings)
    );

    if !listing.diagnostics.is_empty() {
        println!();
        print!("{}", format_diagnostics(&listing.diagnostics));
    }

    Ok(())
}
