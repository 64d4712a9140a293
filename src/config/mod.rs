#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email_address, validate_file_extension, validate_path, validate_positive_number,
    validate_range, validate_required_fields, Validate,
};
use std::time::Duration;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xlsm", "xls", "ods"];

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DELAY_SECONDS: u64 = 5;
const MAX_DELAY_SECONDS: u64 = 3600;
const MAX_SMTP_TIMEOUT_SECONDS: u64 = 600;

// 必要設定以環境變數名稱回報
pub const CONTACTS_FILE: &str = "CONTACTS_FILE";
pub const SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD: &str = "SENDER_PASSWORD";

/// 尚未驗證、可能來自多個層級（旗標/環境變數/TOML）的設定
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CampaignSettings {
    pub contacts_path: Option<String>,
    pub sheet: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_timeout_seconds: Option<u64>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub sender_name: Option<String>,
    pub delay_seconds: Option<u64>,
    pub max_sends: Option<usize>,
    pub dry_run: bool,
}

impl std::fmt::Debug for CampaignSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignSettings")
            .field("contacts_path", &self.contacts_path)
            .field("sheet", &self.sheet)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_timeout_seconds", &self.smtp_timeout_seconds)
            .field("sender_email", &self.sender_email)
            .field(
                "sender_password",
                &self.sender_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sender_name", &self.sender_name)
            .field("delay_seconds", &self.delay_seconds)
            .field("max_sends", &self.max_sends)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CampaignSettings {
    /// 以 `self` 為優先，缺少的值由 `fallback` 補上
    pub fn or(self, fallback: CampaignSettings) -> Self {
        Self {
            contacts_path: self.contacts_path.or(fallback.contacts_path),
            sheet: self.sheet.or(fallback.sheet),
            smtp_host: self.smtp_host.or(fallback.smtp_host),
            smtp_port: self.smtp_port.or(fallback.smtp_port),
            smtp_timeout_seconds: self.smtp_timeout_seconds.or(fallback.smtp_timeout_seconds),
            sender_email: self.sender_email.or(fallback.sender_email),
            sender_password: self.sender_password.or(fallback.sender_password),
            sender_name: self.sender_name.or(fallback.sender_name),
            delay_seconds: self.delay_seconds.or(fallback.delay_seconds),
            max_sends: self.max_sends.or(fallback.max_sends),
            dry_run: self.dry_run || fallback.dry_run,
        }
    }

    pub fn into_config(self) -> Result<CampaignConfig> {
        self.validate()?;

        // validate() 已確認必要欄位存在
        let contacts_path = self.contacts_path.unwrap_or_default().trim().to_string();
        let sender_email = self.sender_email.unwrap_or_default().trim().to_string();
        let sender_password = self.sender_password.unwrap_or_default();

        Ok(CampaignConfig {
            source: SourceSettings {
                path: contacts_path,
                sheet: self
                    .sheet
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            },
            smtp: SmtpSettings {
                host: self
                    .smtp_host
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                timeout: Duration::from_secs(
                    self.smtp_timeout_seconds
                        .unwrap_or(DEFAULT_SMTP_TIMEOUT_SECONDS),
                ),
                sender_email,
                sender_password,
                sender_name: self
                    .sender_name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            },
            send_delay: Duration::from_secs(self.delay_seconds.unwrap_or(DEFAULT_DELAY_SECONDS)),
            max_sends: self.max_sends,
            dry_run: self.dry_run,
        })
    }
}

impl Validate for CampaignSettings {
    fn validate(&self) -> Result<()> {
        validate_required_fields(&[
            (SENDER_EMAIL, self.sender_email.as_deref()),
            (SENDER_PASSWORD, self.sender_password.as_deref()),
            (CONTACTS_FILE, self.contacts_path.as_deref()),
        ])?;

        if let Some(path) = self.contacts_path.as_deref().map(str::trim) {
            validate_path(CONTACTS_FILE, path)?;
            validate_file_extension(CONTACTS_FILE, path, &SUPPORTED_EXTENSIONS)?;
        }
        if let Some(email) = &self.sender_email {
            validate_email_address(SENDER_EMAIL, email)?;
        }
        if let Some(port) = self.smtp_port {
            validate_positive_number("SMTP_PORT", usize::from(port), 1)?;
        }
        if let Some(timeout) = self.smtp_timeout_seconds {
            validate_range("SMTP_TIMEOUT_SECONDS", timeout, 1, MAX_SMTP_TIMEOUT_SECONDS)?;
        }
        if let Some(delay) = self.delay_seconds {
            validate_range("SEND_DELAY_SECONDS", delay, 0, MAX_DELAY_SECONDS)?;
        }
        if let Some(limit) = self.max_sends {
            validate_positive_number("limit", limit, 1)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub path: String,
    pub sheet: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub sender_email: String,
    pub sender_password: String,
    pub sender_name: Option<String>,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"[REDACTED]")
            .field("sender_name", &self.sender_name)
            .finish()
    }
}

/// 啟動時建立並驗證一次，之後不再變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignConfig {
    source: SourceSettings,
    smtp: SmtpSettings,
    send_delay: Duration,
    max_sends: Option<usize>,
    dry_run: bool,
}

impl CampaignConfig {
    pub fn source(&self) -> &SourceSettings {
        &self.source
    }

    pub fn smtp(&self) -> &SmtpSettings {
        &self.smtp
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.smtp.sender_name.as_deref()
    }

    pub fn send_delay(&self) -> Duration {
        self.send_delay
    }

    pub fn max_sends(&self) -> Option<usize> {
        self.max_sends
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::OutreachError;

    fn complete_settings() -> CampaignSettings {
        CampaignSettings {
            contacts_path: Some("professors.xlsx".to_string()),
            sender_email: Some("student@example.edu".to_string()),
            sender_password: Some("app-password".to_string()),
            sender_name: Some("Sam Student".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = complete_settings().into_config().unwrap();
        assert_eq!(config.smtp().host, DEFAULT_SMTP_HOST);
        assert_eq!(config.smtp().port, DEFAULT_SMTP_PORT);
        assert_eq!(config.send_delay(), Duration::from_secs(DEFAULT_DELAY_SECONDS));
        assert_eq!(config.source().sheet, None);
        assert_eq!(config.sender_name(), Some("Sam Student"));
        assert_eq!(config.max_sends(), None);
        assert!(!config.is_dry_run());
    }

    #[test]
    fn test_missing_credential_is_named() {
        let settings = CampaignSettings {
            sender_password: None,
            ..complete_settings()
        };

        match settings.into_config() {
            Err(OutreachError::MissingConfigError { fields }) => {
                assert_eq!(fields, vec![SENDER_PASSWORD.to_string()]);
            }
            other => panic!("expected MissingConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_settings_reported_together() {
        let err = CampaignSettings::default().into_config().unwrap_err();
        let message = err.to_string();
        assert!(message.contains(SENDER_EMAIL));
        assert!(message.contains(SENDER_PASSWORD));
        assert!(message.contains(CONTACTS_FILE));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_extension = CampaignSettings {
            contacts_path: Some("professors.docx".to_string()),
            ..complete_settings()
        };
        assert!(bad_extension.into_config().is_err());

        let bad_sender = CampaignSettings {
            sender_email: Some("student.example.edu".to_string()),
            ..complete_settings()
        };
        assert!(bad_sender.into_config().is_err());

        let zero_port = CampaignSettings {
            smtp_port: Some(0),
            ..complete_settings()
        };
        assert!(zero_port.into_config().is_err());

        let huge_delay = CampaignSettings {
            delay_seconds: Some(86_400),
            ..complete_settings()
        };
        assert!(huge_delay.into_config().is_err());
    }

    #[test]
    fn test_primary_layer_wins_over_fallback() {
        let primary = CampaignSettings {
            smtp_port: Some(2525),
            ..Default::default()
        };
        let fallback = CampaignSettings {
            smtp_port: Some(465),
            smtp_host: Some("mail.example.edu".to_string()),
            ..complete_settings()
        };

        let merged = primary.or(fallback);
        assert_eq!(merged.smtp_port, Some(2525));
        assert_eq!(merged.smtp_host.as_deref(), Some("mail.example.edu"));
        assert_eq!(merged.sender_email.as_deref(), Some("student@example.edu"));
    }

    #[test]
    fn test_debug_output_redacts_password() {
        let settings = complete_settings();
        assert!(!format!("{:?}", settings).contains("app-password"));

        let config = settings.into_config().unwrap();
        assert!(!format!("{:?}", config).contains("app-password"));
    }
}
