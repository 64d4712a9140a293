use clap::Parser;
use prof_outreach::adapters::{write_json_report, DryRunMailer, NoPause, SmtpMailer, TokioPacer};
use prof_outreach::config::cli::LogFormat;
use prof_outreach::core::{ContactStore, MailTransport, Pacer};
use prof_outreach::utils::logger;
use prof_outreach::{
    CampaignConfig, CampaignRunner, CliConfig, OutreachError, SpreadsheetStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 必須在解析旗標前載入，clap 才讀得到這些環境變數
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = match CliConfig::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("🚀 Starting prof-outreach");
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }

    // 驗證配置：任何讀檔或連線之前
    let config = match cli.settings().and_then(|settings| settings.into_config()) {
        Ok(config) => config,
        Err(e) => abort(e),
    };
    tracing::debug!("Campaign config: {:?}", config);
    display_config_summary(&config, cli.report.as_deref());

    let store = SpreadsheetStore::from_settings(config.source());
    let report = if config.is_dry_run() {
        tracing::info!("🔍 DRY RUN MODE - no emails will be sent");
        execute(config, store, DryRunMailer, NoPause).await
    } else {
        let mailer = SmtpMailer::new(config.smtp().clone());
        execute(config, store, mailer, TokioPacer).await
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => abort(e),
    };

    if let Some(path) = &cli.report {
        match write_json_report(path, &report) {
            Ok(()) => tracing::info!("📁 Report saved to: {}", path),
            Err(e) => abort(e),
        }
    }

    println!("✅ Outreach finished. {}", report.tally);

    if report.has_failures() {
        tracing::warn!("⚠️ Completed with {} failed send(s)", report.tally.failed);
        std::process::exit(2);
    }

    Ok(())
}

async fn execute<S, T, P>(
    config: CampaignConfig,
    store: S,
    transport: T,
    pacer: P,
) -> prof_outreach::Result<prof_outreach::core::CampaignReport>
where
    S: ContactStore,
    T: MailTransport,
    P: Pacer,
{
    CampaignRunner::new(config, store, transport, pacer).run().await
}

fn abort(e: OutreachError) -> ! {
    tracing::error!("❌ Outreach aborted: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn display_config_summary(config: &CampaignConfig, report: Option<&str>) {
    println!("📋 Configuration Summary:");
    println!("  Contacts: {}", config.source().path);
    if let Some(sheet) = &config.source().sheet {
        println!("  Sheet: {}", sheet);
    }
    println!("  SMTP: {}:{}", config.smtp().host, config.smtp().port);
    println!("  Sender: {}", config.smtp().sender_email);
    println!("  Delay between sends: {:?}", config.send_delay());

    if let Some(limit) = config.max_sends() {
        println!("  Send limit: {}", limit);
    }
    if let Some(path) = report {
        println!("  Report: {}", path);
    }
    if config.is_dry_run() {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
