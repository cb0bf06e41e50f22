//! CLI command handlers, one file per command.

mod balance;
mod rates;
mod resiliency;
mod summarize;
mod transfer;

pub use balance::run_balance;
pub use rates::run_rates;
pub use resiliency::run_resiliency;
pub use summarize::run_summarize;
pub use transfer::run_transfer;
