//! Core data models for the treasury dashboard
//!
//! Plain records as the persistence layer hands them over: companies,
//! categories, cost/revenue entries and transactions, plus the money and
//! report window value types.

pub mod category;
pub mod company;
pub mod entry;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod window;

pub use category::Category;
pub use company::Company;
pub use entry::{EntryKind, Frequency, MonetaryEntry};
pub use ids::{CategoryId, CompanyId, EntryId, TransactionId};
pub use money::Money;
pub use transaction::Transaction;
pub use window::ReportWindow;
