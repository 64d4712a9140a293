pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{DryRunMailer, NoPause, SmtpMailer, SpreadsheetStore, TokioPacer};
pub use config::{CampaignConfig, CampaignSettings};
pub use core::campaign::CampaignRunner;
pub use utils::error::{OutreachError, Result, SendError};
