use crate::config::CampaignConfig;
use crate::core::composer;
use crate::core::eligibility::{self, Exclusion};
use crate::domain::model::{
    CampaignReport, CampaignTally, ContactRecord, ContactRow, RowOutcome, RowReport,
};
use crate::domain::ports::{ContactStore, MailTransport, Pacer};
use crate::utils::error::Result;
use chrono::Utc;

pub struct CampaignRunner<S: ContactStore, T: MailTransport, P: Pacer> {
    config: CampaignConfig,
    store: S,
    transport: T,
    pacer: P,
}

impl<S: ContactStore, T: MailTransport, P: Pacer> CampaignRunner<S, T, P> {
    pub fn new(config: CampaignConfig, store: S, transport: T, pacer: P) -> Self {
        Self {
            config,
            store,
            transport,
            pacer,
        }
    }

    /// 讀取失敗會直接回傳錯誤（尚未發送任何信件）；單列發送失敗只記錄在報告中
    pub async fn run(&self) -> Result<CampaignReport> {
        let started_at = Utc::now();

        tracing::info!("📥 Loading contacts from {}", self.store.describe());
        let rows = self.store.load_rows().await?;
        tracing::info!("📋 Loaded {} contact rows", rows.len());

        let mut tally = CampaignTally::default();
        let mut reports = Vec::with_capacity(rows.len());

        for row in &rows {
            if let Some(limit) = self.config.max_sends() {
                if tally.attempted() >= limit {
                    tracing::info!("🛑 Send limit of {} reached, stopping", limit);
                    break;
                }
            }

            let report = self.process_row(row, tally.attempted()).await;
            tally.record(&report.outcome);
            reports.push(report);
        }

        tracing::info!("📊 Campaign complete. {}", tally);

        Ok(CampaignReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: self.config.is_dry_run(),
            tally,
            rows: reports,
        })
    }

    async fn process_row(&self, row: &ContactRow, attempted_so_far: usize) -> RowReport {
        let record = match ContactRecord::from_row(row) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("⏭️ Skipping malformed {}: {}", row.label(), e);
                return RowReport {
                    position: row.position,
                    professor: row.label(),
                    email: String::new(),
                    outcome: RowOutcome::Skipped {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let outcome = match eligibility::check(&record) {
            Err(Exclusion::AlreadyContacted) => {
                tracing::info!("⏭️ Skipping {}: already contacted", record.label());
                RowOutcome::Skipped {
                    reason: Exclusion::AlreadyContacted.to_string(),
                }
            }
            Err(exclusion) => {
                tracing::warn!("⏭️ Excluding {}: {}", record.label(), exclusion);
                RowOutcome::Skipped {
                    reason: exclusion.to_string(),
                }
            }
            Ok(()) => {
                // 只在兩次實際發送之間暫停
                if attempted_so_far > 0 {
                    self.pacer.pause(self.config.send_delay()).await;
                }
                self.deliver(&record).await
            }
        };

        RowReport {
            position: record.position,
            professor: record.label(),
            email: record.email,
            outcome,
        }
    }

    async fn deliver(&self, record: &ContactRecord) -> RowOutcome {
        let variant = composer::variant(record);
        let message = composer::compose(record, self.config.sender_name());

        match self
            .transport
            .send(&record.email, &message.subject, &message.body)
            .await
        {
            Ok(()) => {
                tracing::info!("{}", sent_line(record, self.config.is_dry_run()));
                RowOutcome::Sent { variant }
            }
            Err(e) => {
                tracing::error!(
                    "❌ Failed to send email to {} <{}>: {}",
                    record.professor_name,
                    record.email,
                    e
                );
                RowOutcome::Failed {
                    variant,
                    cause: e.to_string(),
                }
            }
        }
    }
}

/// 試跑時標示 [dry-run]，避免看起來像真的寄出
fn sent_line(record: &ContactRecord, dry_run: bool) -> String {
    let marker = if dry_run { " [dry-run]" } else { "" };
    format!(
        "✅{} Email sent to {} at {} <{}>",
        marker, record.professor_name, record.institution, record.email
    )
}
