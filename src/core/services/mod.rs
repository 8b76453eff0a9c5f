pub mod account_service;
pub mod movement_service;
pub mod summary_service;

pub use account_service::AccountService;
pub use movement_service::{MonthView, MovementService};
pub use summary_service::{CategoryTotal, LedgerSummary, SummaryService, UNCATEGORIZED};
