use crate::config::CampaignSettings;
use crate::utils::error::{OutreachError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub smtp: Option<SmtpConfig>,
    pub sender: Option<SenderConfig>,
    pub campaign: Option<CampaignSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SenderConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl std::fmt::Debug for SenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignSection {
    pub delay_seconds: Option<u64>,
    pub max_sends: Option<usize>,
    pub dry_run: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| OutreachError::ConfigParseError {
                field: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OutreachError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SENDER_PASSWORD})；未設定的變數換成空字串，交給必要欄位檢查回報
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            OutreachError::ConfigParseError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} referenced in config is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    pub fn into_settings(self) -> CampaignSettings {
        let source = self.source.unwrap_or_default();
        let smtp = self.smtp.unwrap_or_default();
        let sender = self.sender.unwrap_or_default();
        let campaign = self.campaign.unwrap_or_default();

        CampaignSettings {
            contacts_path: source.path,
            sheet: source.sheet,
            smtp_host: smtp.host,
            smtp_port: smtp.port,
            smtp_timeout_seconds: smtp.timeout_seconds,
            sender_email: sender.email,
            sender_password: sender.password,
            sender_name: sender.name,
            delay_seconds: campaign.delay_seconds,
            max_sends: campaign.max_sends,
            dry_run: campaign.dry_run.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
path = "professors.xlsx"
sheet = "Fall"

[smtp]
host = "smtp.example.edu"
port = 2525

[sender]
email = "student@example.edu"
password = "secret"
name = "Sam Student"

[campaign]
delay_seconds = 10
max_sends = 25
"#;

        let settings = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();

        assert_eq!(settings.contacts_path.as_deref(), Some("professors.xlsx"));
        assert_eq!(settings.sheet.as_deref(), Some("Fall"));
        assert_eq!(settings.smtp_host.as_deref(), Some("smtp.example.edu"));
        assert_eq!(settings.smtp_port, Some(2525));
        assert_eq!(settings.sender_name.as_deref(), Some("Sam Student"));
        assert_eq!(settings.delay_seconds, Some(10));
        assert_eq!(settings.max_sends, Some(25));
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_all_sections_optional() {
        let settings = TomlConfig::from_toml_str("").unwrap().into_settings();
        assert_eq!(settings, CampaignSettings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PROF_OUTREACH_TEST_PASSWORD", "from-env");

        let toml_content = r#"
[sender]
email = "student@example.edu"
password = "${PROF_OUTREACH_TEST_PASSWORD}"
name = "${PROF_OUTREACH_TEST_UNSET_NAME}"
"#;

        let settings = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();
        assert_eq!(settings.sender_password.as_deref(), Some("from-env"));
        assert_eq!(settings.sender_name.as_deref(), Some(""));

        std::env::remove_var("PROF_OUTREACH_TEST_PASSWORD");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[smtp]\nport = \"not a number\"").unwrap_err();
        assert!(matches!(err, OutreachError::ConfigParseError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\npath = \"contacts.csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.source.and_then(|s| s.path).as_deref(),
            Some("contacts.csv")
        );
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, OutreachError::ConfigParseError { .. }));
    }
}
