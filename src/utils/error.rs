use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutreachError {
    #[error("Missing required configuration: {}", fields.join(", "))]
    MissingConfigError { fields: Vec<String> },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Contact source not found: {path}")]
    SourceNotFoundError { path: String },

    #[error("Contact source {path} could not be read: {reason}")]
    SourceUnreadableError { path: String, reason: String },

    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFoundError { path: String, sheet: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    DataSource,
    Output,
}

impl OutreachError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigParseError { .. } => ErrorCategory::Configuration,
            Self::SourceNotFoundError { .. }
            | Self::SourceUnreadableError { .. }
            | Self::SheetNotFoundError { .. }
            | Self::CsvError(_)
            | Self::SpreadsheetError(_) => ErrorCategory::DataSource,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Output,
        }
    }

    /// 1 = 發送前中止, 3 = 發送後輸出失敗
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::DataSource => 1,
            ErrorCategory::Output => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                format!("Configuration problem, no emails were sent. {}", self)
            }
            ErrorCategory::DataSource => {
                format!("Could not load the contact list, no emails were sent. {}", self)
            }
            ErrorCategory::Output => format!("Failed to write run output. {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingConfigError { fields } => format!(
                "Set {} in the environment, a .env file, or the --config TOML file",
                fields.join(", ")
            ),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Check the value supplied for {}", field)
            }
            Self::ConfigParseError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            Self::SourceNotFoundError { .. } => {
                "Check CONTACTS_FILE points at an existing .csv/.xlsx file".to_string()
            }
            Self::SheetNotFoundError { .. } => {
                "Check CONTACTS_SHEET or omit it to use the first sheet".to_string()
            }
            Self::SourceUnreadableError { .. } | Self::CsvError(_) | Self::SpreadsheetError(_) => {
                "Make sure the file is not open elsewhere and keeps the expected column order"
                    .to_string()
            }
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check the report path is writable".to_string()
            }
        }
    }
}

/// 單筆發送失敗；只影響該列，不會中止整批
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("SMTP connection failed: {0}")]
    Connection(String),

    #[error("rejected by server: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, OutreachError>;
