//! CLI commands for company management

use clap::Subcommand;

use crate::display::format_company_list;
use crate::error::{TreasuryError, TreasuryResult};
use crate::models::Company;
use crate::storage::Storage;

/// Company subcommands
#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// List all companies
    #[command(alias = "ls")]
    List,

    /// Create a new company
    Add {
        /// Company name
        name: String,
    },
}

/// Handle company commands
pub fn handle_company_command(storage: &Storage, cmd: CompanyCommands) -> TreasuryResult<()> {
    match cmd {
        CompanyCommands::List => {
            let companies = storage.companies.get_all()?;
            println!("{}", format_company_list(&companies));
        }
        CompanyCommands::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(TreasuryError::Validation(
                    "Company name cannot be empty".into(),
                ));
            }
            if storage.companies.get_by_name(name)?.is_some() {
                return Err(TreasuryError::Validation(format!(
                    "Company '{}' already exists",
                    name
                )));
            }

            let company = Company::new(name);
            storage.companies.upsert(company.clone())?;
            storage.companies.save()?;

            println!("Created company: {}", company.name);
            println!("  ID: {}", company.id.as_uuid());
        }
    }

    Ok(())
}
