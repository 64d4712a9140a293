// Adapters layer: concrete implementations for external systems (contact files, SMTP, clock).

pub mod pacing;
pub mod report;
pub mod smtp;
pub mod spreadsheet;

pub use pacing::{NoPause, TokioPacer};
pub use report::write_json_report;
pub use smtp::{DryRunMailer, SmtpMailer};
pub use spreadsheet::SpreadsheetStore;
