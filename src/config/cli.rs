use crate::config::toml_config::TomlConfig;
use crate::config::CampaignSettings;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Parser)]
#[command(name = "prof-outreach")]
#[command(about = "Send personalized outreach emails to professors listed in a contact spreadsheet")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Contact list (.csv, .xlsx, .xlsm, .xls, .ods)
    #[arg(long, env = "CONTACTS_FILE")]
    pub contacts: Option<String>,

    /// Worksheet name; defaults to the first sheet
    #[arg(long, env = "CONTACTS_SHEET")]
    pub sheet: Option<String>,

    #[arg(long, env = "SMTP_SERVER")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    #[arg(long, env = "SMTP_TIMEOUT_SECONDS")]
    pub smtp_timeout_seconds: Option<u64>,

    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: Option<String>,

    #[arg(long, env = "SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    #[arg(long, env = "SENDER_NAME")]
    pub sender_name: Option<String>,

    /// Pause between two send attempts, in seconds
    #[arg(long, env = "SEND_DELAY_SECONDS")]
    pub delay_seconds: Option<u64>,

    /// Stop after this many send attempts
    #[arg(long)]
    pub limit: Option<usize>,

    /// Compose and log every message without connecting to the SMTP server
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of every row outcome to this path
    #[arg(long)]
    pub report: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    fn flag_settings(&self) -> CampaignSettings {
        CampaignSettings {
            contacts_path: self.contacts.clone(),
            sheet: self.sheet.clone(),
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            smtp_timeout_seconds: self.smtp_timeout_seconds,
            sender_email: self.sender_email.clone(),
            sender_password: self.sender_password.clone(),
            sender_name: self.sender_name.clone(),
            delay_seconds: self.delay_seconds,
            max_sends: self.limit,
            dry_run: self.dry_run,
        }
    }

    /// 旗標/環境變數優先，其次是 TOML 檔
    pub fn settings(&self) -> Result<CampaignSettings> {
        let flags = self.flag_settings();
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                Ok(flags.or(TomlConfig::from_file(path)?.into_settings()))
            }
            None => Ok(flags),
        }
    }
}
