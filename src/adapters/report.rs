use crate::domain::model::CampaignReport;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

pub fn write_json_report(path: impl AsRef<Path>, report: &CampaignReport) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json_data = serde_json::to_string_pretty(report)?;
    fs::write(path, json_data)?;

    tracing::debug!("Report ({} rows) written to {}", report.rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CampaignTally, RowOutcome, RowReport, TemplateVariant};
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_report_written_with_row_outcomes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runs").join("report.json");

        let report = CampaignReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            dry_run: false,
            tally: CampaignTally {
                sent: 1,
                failed: 1,
                skipped: 0,
            },
            rows: vec![
                RowReport {
                    position: 1,
                    professor: "Ada".to_string(),
                    email: "ada@a.edu".to_string(),
                    outcome: RowOutcome::Sent {
                        variant: TemplateVariant::PaperKnown,
                    },
                },
                RowReport {
                    position: 2,
                    professor: "Bob".to_string(),
                    email: "bob@b.edu".to_string(),
                    outcome: RowOutcome::Failed {
                        variant: TemplateVariant::NoPaperCited,
                        cause: "timeout".to_string(),
                    },
                },
            ],
        };

        write_json_report(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tally"]["sent"], 1);
        assert_eq!(value["rows"][0]["status"], "sent");
        assert_eq!(value["rows"][0]["variant"], "paper_known");
        assert_eq!(value["rows"][1]["status"], "failed");
        assert_eq!(value["rows"][1]["cause"], "timeout");
    }
}
