use crate::config::SourceSettings;
use crate::domain::model::ContactRow;
use crate::domain::ports::ContactStore;
use crate::utils::error::{OutreachError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Workbook,
}

/// 讀取聯絡人清單；第一列一律視為表頭
#[derive(Debug, Clone)]
pub struct SpreadsheetStore {
    path: PathBuf,
    sheet: Option<String>,
}

impl SpreadsheetStore {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self {
            path: path.into(),
            sheet,
        }
    }

    pub fn from_settings(settings: &SourceSettings) -> Self {
        Self::new(&settings.path, settings.sheet.clone())
    }

    fn format(&self) -> Result<SourceFormat> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xlsx" | "xlsm" | "xls" | "ods") => Ok(SourceFormat::Workbook),
            _ => Err(OutreachError::SourceUnreadableError {
                path: self.path.display().to_string(),
                reason: "unsupported file type".to_string(),
            }),
        }
    }

    fn read_rows(&self) -> Result<Vec<ContactRow>> {
        if !self.path.exists() {
            return Err(OutreachError::SourceNotFoundError {
                path: self.path.display().to_string(),
            });
        }

        let raw_rows = match self.format()? {
            SourceFormat::Csv => read_csv(&self.path)?,
            SourceFormat::Workbook => read_workbook(&self.path, self.sheet.as_deref())?,
        };

        let rows: Vec<ContactRow> = raw_rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| ContactRow::new(index + 1, cells))
            .filter(|row| {
                let blank = row.is_blank();
                if blank {
                    tracing::debug!("Ignoring blank row {}", row.position);
                }
                !blank
            })
            .collect();

        Ok(rows)
    }
}

impl ContactStore for SpreadsheetStore {
    async fn load_rows(&self) -> Result<Vec<ContactRow>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_rows())
            .await
            .map_err(|e| OutreachError::SourceUnreadableError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?
    }

    fn describe(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{} [{}]", self.path.display(), sheet),
            None => self.path.display().to_string(),
        }
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<Option<String>>>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        OutreachError::SourceUnreadableError {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(OutreachError::SheetNotFoundError {
                    path: path.display().to_string(),
                    sheet: name.to_string(),
                });
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| OutreachError::SourceUnreadableError {
                path: path.display().to_string(),
                reason: "workbook has no worksheets".to_string(),
            })??,
    };

    // 跳過表頭
    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// 非文字儲存格轉成顯示字串，不會失敗
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
