//! CLI command handler for snapshot import

use std::path::Path;

use crate::error::{TreasuryError, TreasuryResult};
use crate::storage::{LedgerSnapshot, Storage};

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &Path) -> TreasuryResult<()> {
    if !file.exists() {
        return Err(TreasuryError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let snapshot = LedgerSnapshot::load(file)?;
    let summary = storage.import_snapshot(&snapshot)?;

    println!("Imported {}", file.display());
    println!("{}", "=".repeat(40));
    println!("  Companies:    {}", summary.companies);
    println!("  Categories:   {}", summary.categories);
    println!("  Transactions: {}", summary.transactions);
    println!("  Entries:      {}", summary.entries);

    Ok(())
}
