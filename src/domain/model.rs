use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 欄位順序是契約：重新排列來源欄位會破壞解析
const COL_PROFESSOR_NAME: usize = 0;
const COL_INSTITUTION: usize = 1;
const COL_EMAIL: usize = 2;
const COL_RESEARCH_AREA: usize = 3;
const COL_HAS_PAPER: usize = 4;
const COL_PAPER_TITLE: usize = 5;
const COL_ALREADY_CONTACTED: usize = 6;

const REQUIRED_COLUMNS: usize = COL_EMAIL + 1;

/// 來源中的一列原始資料（表頭不算）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    /// 1-based data row index
    pub position: usize,
    pub cells: Vec<Option<String>>,
}

impl ContactRow {
    pub fn new(position: usize, cells: Vec<Option<String>>) -> Self {
        Self { position, cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.as_deref().map(str::trim).unwrap_or("").is_empty())
    }

    fn cell(&self, index: usize) -> &str {
        self.cells
            .get(index)
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .unwrap_or("")
    }

    /// Professor name when present, otherwise `row N`.
    pub fn label(&self) -> String {
        label_for(self.cell(COL_PROFESSOR_NAME), self.position)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row has {found} column(s), expected at least {expected}")]
    TooFewColumns { found: usize, expected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub position: usize,
    pub professor_name: String,
    pub institution: String,
    pub email: String,
    pub research_area: String,
    pub has_paper: bool,
    pub paper_title: Option<String>,
    pub already_contacted: bool,
}

impl ContactRecord {
    pub fn from_row(row: &ContactRow) -> Result<Self, RowError> {
        if row.cells.len() < REQUIRED_COLUMNS {
            return Err(RowError::TooFewColumns {
                found: row.cells.len(),
                expected: REQUIRED_COLUMNS,
            });
        }

        Ok(Self {
            position: row.position,
            professor_name: row.cell(COL_PROFESSOR_NAME).to_string(),
            institution: row.cell(COL_INSTITUTION).to_string(),
            email: row.cell(COL_EMAIL).to_string(),
            research_area: row.cell(COL_RESEARCH_AREA).to_string(),
            has_paper: is_paper_flag_set(row.cell(COL_HAS_PAPER)),
            paper_title: normalize_paper_title(row.cell(COL_PAPER_TITLE)),
            already_contacted: is_contacted_flag_set(row.cell(COL_ALREADY_CONTACTED)),
        })
    }

    pub fn label(&self) -> String {
        label_for(&self.professor_name, self.position)
    }
}

fn label_for(name: &str, position: usize) -> String {
    if name.is_empty() {
        format!("row {}", position)
    } else {
        name.to_string()
    }
}

/// "yes"（不分大小寫、去空白）才算已聯絡；其他任何值都是 false
pub fn is_contacted_flag_set(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

pub fn is_paper_flag_set(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("y") || value.eq_ignore_ascii_case("yes")
}

/// 空白或試算表匯出的 "nan" 都視為沒有論文標題
pub fn normalize_paper_title(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    PaperKnown,
    NoPaperCited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CampaignTally {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CampaignTally {
    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Sent { .. } => self.sent += 1,
            RowOutcome::Failed { .. } => self.failed += 1,
            RowOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// 執行結束時的摘要行
impl fmt::Display for CampaignTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successful: {}, Failed: {}, Skipped: {}",
            self.sent, self.failed, self.skipped
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Skipped { reason: String },
    Sent { variant: TemplateVariant },
    Failed { variant: TemplateVariant, cause: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub position: usize,
    pub professor: String,
    pub email: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub tally: CampaignTally,
    pub rows: Vec<RowReport>,
}

impl CampaignReport {
    pub fn has_failures(&self) -> bool {
        self.tally.failed > 0
    }
}
