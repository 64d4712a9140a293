use anyhow::Result;
use async_trait::async_trait;
use prof_outreach::core::{MailTransport, Pacer, RowOutcome};
use prof_outreach::{
    CampaignRunner, CampaignSettings, DryRunMailer, NoPause, OutreachError, SendError,
    SpreadsheetStore,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct ScriptedTransport {
    failing: HashSet<String>,
    attempts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), SendError> {
        self.attempts.lock().unwrap().push(to.to_string());
        if self.failing.contains(to) {
            return Err(SendError::Connection("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CountingPacer {
    count: Arc<Mutex<usize>>,
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self, _delay: Duration) {
        *self.count.lock().unwrap() += 1;
    }
}

const CONTACTS: &str = "\
Professor,Institution,Email,Research Area,Has Paper,Paper Title,Contacted
Ada Lovelace,Cambridge,ada@cam.ac.uk,analytical engines,Y,Sketch of the Analytical Engine,No
Alan Turing,Manchester,alan@man.ac.uk,computability,yes,nan,
Grace Hopper,Yale,grace@yale.edu,compilers,,,no
Edsger Dijkstra,Austin,edsger@utexas.edu,algorithms,yes,Go To Statement,  Yes
Barbara Liskov,MIT,liskov-at-mit.edu,abstraction,no,,no
";

fn write_contacts(dir: &TempDir) -> Result<String> {
    let path = dir.path().join("professors.csv");
    std::fs::write(&path, CONTACTS)?;
    Ok(path.to_string_lossy().into_owned())
}

fn settings(contacts_path: &str) -> CampaignSettings {
    CampaignSettings {
        contacts_path: Some(contacts_path.to_string()),
        sender_email: Some("student@example.edu".to_string()),
        sender_password: Some("app-password".to_string()),
        sender_name: Some("Sam Student".to_string()),
        delay_seconds: Some(0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_end_to_end_with_one_failed_send() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_contacts(&dir)?;
    let config = settings(&path).into_config()?;

    let transport = ScriptedTransport {
        failing: ["alan@man.ac.uk".to_string()].into_iter().collect(),
        ..Default::default()
    };
    let pacer = CountingPacer::default();
    let store = SpreadsheetStore::from_settings(config.source());
    let runner = CampaignRunner::new(config, store, transport.clone(), pacer.clone());

    let report = runner.run().await?;

    assert_eq!(
        *transport.attempts.lock().unwrap(),
        vec!["ada@cam.ac.uk", "alan@man.ac.uk", "grace@yale.edu"]
    );
    assert_eq!(report.tally.sent, 2);
    assert_eq!(report.tally.failed, 1);
    assert_eq!(report.tally.skipped, 2);
    assert_eq!(*pacer.count.lock().unwrap(), 2);

    match &report.rows[1].outcome {
        RowOutcome::Failed { cause, .. } => assert!(cause.contains("connection reset by peer")),
        other => panic!("expected failure for row 2, got {:?}", other),
    }
    assert_eq!(report.rows[3].professor, "Edsger Dijkstra");
    assert!(matches!(report.rows[3].outcome, RowOutcome::Skipped { .. }));
    assert!(matches!(report.rows[4].outcome, RowOutcome::Skipped { .. }));
    assert!(report.has_failures());

    Ok(())
}

#[tokio::test]
async fn test_dry_run_composes_without_transport() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_contacts(&dir)?;
    let config = CampaignSettings {
        dry_run: true,
        ..settings(&path)
    }
    .into_config()?;

    let store = SpreadsheetStore::from_settings(config.source());
    let report = CampaignRunner::new(config, store, DryRunMailer, NoPause)
        .run()
        .await?;

    assert!(report.dry_run);
    assert_eq!(report.tally.sent, 3);
    assert_eq!(report.tally.failed, 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_credential_aborts_before_reading_contacts() -> Result<()> {
    let err = CampaignSettings {
        sender_password: None,
        ..settings("/does/not/exist/professors.xlsx")
    }
    .into_config()
    .unwrap_err();

    match err {
        OutreachError::MissingConfigError { fields } => {
            assert_eq!(fields, vec!["SENDER_PASSWORD"]);
        }
        other => panic!("expected MissingConfigError, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_contact_file_aborts_without_sending() -> Result<()> {
    let config = settings("/does/not/exist/professors.csv").into_config()?;
    let transport = ScriptedTransport::default();
    let store = SpreadsheetStore::from_settings(config.source());

    let err = CampaignRunner::new(config, store, transport.clone(), NoPause)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, OutreachError::SourceNotFoundError { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(transport.attempts.lock().unwrap().is_empty());
    Ok(())
}
