//! CLI command showing a company's category forest

use crate::display::{format_category_tree, format_diagnostics};
use crate::engine::{CategoryTree, Diagnostics};
use crate::error::TreasuryResult;
use crate::storage::{LedgerRepository, Storage};

use super::find_company;

/// Handle the tree command
pub fn handle_tree_command(storage: &Storage, company: &str) -> TreasuryResult<()> {
    let company = find_company(storage, company)?;
    let categories = storage.list_categories(company.id)?;

    let mut diagnostics = Diagnostics::new();
    let tree = CategoryTree::build(company.id, &categories, &mut diagnostics);

    println!("Categories of {}", company.name);
    println!("{}", "=".repeat(40));
    print!("{}", format_category_tree(&tree));

    if !diagnostics.is_empty() {
        println!();
        print!("{}", format_diagnostics(&diagnostics));
    }

    Ok(())
}
